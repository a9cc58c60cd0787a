#[cfg(test)]
mod tests {
    use cube_analyst::model::loader::parse_str;
    use cube_analyst::{Catalog, FieldKind};
    use std::collections::HashSet;

    const LAYER: &str = r#"{"cube":"Orders","field":"net_sales","kind":"measure","description":"Total net sales","cube_description":"Customer orders"}
{"cube":"Goods","field":"net_sales","kind":"measure","description":"Net sales of goods"}
{"cube":"Orders","field":"product_brand","kind":"dimension","description":"Brand name"}
{"cube":"Orders","field":"net_sales","kind":"measure","description":"Net sales after returns"}
{"cube":"Goods","field":"category","kind":"dimension","description":"Goods category"}
{"cube":"Goods","field":"category","kind":"measure","description":"Category count"}
"#;

    /// Check the naming invariants that must hold for any catalog
    fn assert_unique_names(catalog: &Catalog) {
        let mut cubes = HashSet::new();
        for cube in catalog.cubes() {
            assert!(cubes.insert(&cube.name), "duplicate cube {}", cube.name);

            let mut fields = HashSet::new();
            for field in cube.fields() {
                assert!(
                    fields.insert(&field.name),
                    "duplicate field {}.{}",
                    cube.name,
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_loading_twice_is_identical() {
        let first = parse_str(LAYER);
        let second = parse_str(LAYER);

        assert_eq!(first.catalog, second.catalog);
        assert_eq!(first.report, second.report);

        let order = |c: &Catalog| -> Vec<String> {
            c.cubes()
                .iter()
                .flat_map(|cube| cube.fields().map(move |f| format!("{}.{}", cube.name, f.name)))
                .collect()
        };
        assert_eq!(order(&first.catalog), order(&second.catalog));
    }

    #[test]
    fn test_names_stay_unique_after_duplicates() {
        let loaded = parse_str(LAYER);
        assert_unique_names(&loaded.catalog);

        assert_eq!(loaded.report.loaded_count, 6);
        assert_eq!(loaded.catalog.cube_count(), 2);
        assert_eq!(loaded.catalog.field_count(), 4);
    }

    #[test]
    fn test_later_duplicate_replaces_attributes() {
        let loaded = parse_str(LAYER);
        let orders = loaded.catalog.cube("Orders").unwrap();

        assert_eq!(orders.measures.len(), 1);
        assert_eq!(
            orders.measure("net_sales").unwrap().description,
            "Net sales after returns"
        );
        assert_eq!(orders.description.as_deref(), Some("Customer orders"));

        let goods = loaded.catalog.cube("Goods").unwrap();
        let category = goods.field("category").unwrap();
        assert_eq!(category.kind, FieldKind::Measure);
        assert_eq!(category.description, "Category count");
        assert!(goods.dimension("category").is_none());
    }

    #[test]
    fn test_cross_cube_duplicates_are_distinct() {
        let loaded = parse_str(LAYER);

        let orders = loaded.catalog.field("Orders", "net_sales").unwrap();
        let goods = loaded.catalog.field("Goods", "net_sales").unwrap();
        assert_ne!(orders.description, goods.description);
    }
}
