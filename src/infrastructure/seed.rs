use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::NewProduct;

/// (id, name, price, description, category, stock)
const DEMO_CATALOG: &[(&str, &str, &str, &str, &str, i32)] = &[
    ("p1", "Wireless Headphones", "99.99", "High-quality wireless headphones with noise cancellation.", "Electronics", 25),
    ("p2", "Smartwatch", "199.99", "Stay connected with this feature-rich smartwatch.", "Wearables", 15),
    ("p3", "Portable Bluetooth Speaker", "49.99", "Compact and powerful speaker for on-the-go music.", "Audio", 40),
    ("p4", "Ergonomic Office Chair", "249.99", "Designed for comfort and support during long working hours.", "Home & Office", 8),
    ("p5", "4K Ultra HD Monitor", "399.99", "Stunning visuals with a 4K resolution display.", "Electronics", 12),
    ("p6", "Gaming Keyboard", "79.99", "Mechanical gaming keyboard with customizable RGB lighting.", "Gaming", 30),
    ("p7", "External SSD 1TB", "129.99", "Fast and portable storage solution for all your files.", "Storage", 20),
    ("p8", "Webcam 1080p", "29.99", "Clear video calls and streaming with this full HD webcam.", "Peripherals", 0),
];

/// Load the demo catalog into an empty repository. Returns how many products were inserted.
pub fn seed_demo_catalog(repo: &dyn ProductRepository) -> Result<usize, DomainError> {
    if !repo.list(None)?.is_empty() {
        return Ok(0);
    }

    for (index, (id, name, price, description, category, stock)) in DEMO_CATALOG.iter().enumerate() {
        let price = BigDecimal::from_str(price)
            .map_err(|e| DomainError::Internal(format!("demo price #{index}: {e}")))?;
        repo.create(
            (*id).to_string(),
            NewProduct {
                name: (*name).to_string(),
                description: (*description).to_string(),
                price,
                image_url: format!("https://picsum.photos/id/{}/150/150", (index + 1) * 10),
                category: Some((*category).to_string()),
                stock: *stock,
            },
        )?;
    }
    Ok(DEMO_CATALOG.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryProductRepository;

    #[test]
    fn seeds_once() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(seed_demo_catalog(&repo).unwrap(), 8);
        assert_eq!(seed_demo_catalog(&repo).unwrap(), 0);

        let p1 = repo.find_by_id("p1").unwrap().unwrap();
        assert_eq!(p1.name, "Wireless Headphones");
        assert_eq!(p1.image_url, "https://picsum.photos/id/10/150/150");
    }
}
