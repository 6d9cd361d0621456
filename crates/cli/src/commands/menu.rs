//! Menu listing.

use std::io::Write;

use ochag_storefront::cart::PriceFormat;
use ochag_storefront::catalog::Catalog;

use super::CliError;

/// Print every product with its id and price.
///
/// # Errors
///
/// Returns `CliError::Output` if `out` cannot be written.
pub fn list(catalog: &Catalog, format: &PriceFormat, out: &mut impl Write) -> Result<(), CliError> {
    for product in catalog.products() {
        writeln!(
            out,
            "[{}] {}  {}",
            product.id,
            product.name,
            format.unit_price(product.price)
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_built_in_menu() {
        let mut out = Vec::new();
        list(&Catalog::menu(), &PriceFormat::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("[1] Маргарита  590 ₽\n"));
        assert!(text.contains("[6] Очагъ  890 ₽"));
    }
}
