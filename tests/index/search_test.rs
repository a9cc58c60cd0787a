//! Search behaviour across cube names, field names and descriptions.

use cube_analyst::index::MatchedOn;
use cube_analyst::{FieldKind, SearchFilter, SemanticIndex};

fn index() -> SemanticIndex {
    let index = SemanticIndex::new();
    index.load_str(
        r#"{"cube":"Orders","field":"net_sales","kind":"measure","description":"Total net sales","cube_description":"Customer orders and returns"}
{"cube":"Orders","field":"product_brand","kind":"dimension","description":"Brand name"}
{"cube":"Goods","field":"net_sales","kind":"measure","description":"Net sales of goods"}
{"cube":"Goods","field":"brand_owner","kind":"dimension","description":"Company owning the brand"}
{"cube":"SalesPlan","field":"target","kind":"measure","description":"Planned revenue"}
"#,
    );
    index
}

#[test]
fn test_search_finds_qualified_field() {
    let hits = index().search("net_sales").unwrap();

    let orders = hits
        .iter()
        .find(|h| h.cube == "Orders" && h.field.as_deref() == Some("net_sales"))
        .expect("Orders.net_sales should match");
    assert_eq!(orders.kind, Some(FieldKind::Measure));
    assert_eq!(orders.matched_on, MatchedOn::FieldName);
    assert_eq!(orders.qualified_name(), "Orders.net_sales");
}

#[test]
fn test_search_is_case_insensitive() {
    let index = index();
    let lower = index.search("net_sales").unwrap();
    let upper = index.search("NET_SALES").unwrap();

    assert!(!lower.is_empty());
    assert_eq!(lower, upper);
}

#[test]
fn test_search_reports_cube_matches() {
    let hits = index().search("sales").unwrap();
    let names: Vec<_> = hits.iter().map(|h| h.qualified_name()).collect();

    assert_eq!(
        names,
        vec!["Orders.net_sales", "Goods.net_sales", "SalesPlan"]
    );

    let plan = hits.iter().find(|h| h.cube == "SalesPlan").unwrap();
    assert_eq!(plan.field, None);
    assert_eq!(plan.kind, None);
    assert_eq!(plan.matched_on, MatchedOn::CubeName);
}

#[test]
fn test_search_matches_descriptions() {
    let hits = index().search("company").unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].qualified_name(), "Goods.brand_owner");
    assert_eq!(hits[0].matched_on, MatchedOn::FieldDescription);
    assert_eq!(hits[0].description, "Company owning the brand");
}

#[test]
fn test_search_with_filters() {
    let index = index();

    let brand_dims = index
        .search_with("brand", &SearchFilter::default().kind(FieldKind::Dimension))
        .unwrap();
    let names: Vec<_> = brand_dims.iter().map(|h| h.qualified_name()).collect();
    assert_eq!(names, vec!["Orders.product_brand", "Goods.brand_owner"]);

    let goods_only = index
        .search_with("brand", &SearchFilter::default().cube("Goods"))
        .unwrap();
    assert_eq!(goods_only.len(), 1);
    assert_eq!(goods_only[0].cube, "Goods");

    let measures = index
        .search_with("brand", &SearchFilter::default().kind(FieldKind::Measure))
        .unwrap();
    assert!(measures.is_empty());
}

#[test]
fn test_search_has_no_side_effects() {
    let index = index();
    let before = index.catalog().unwrap();

    let first = index.search("o").unwrap();
    let second = index.search("o").unwrap();

    assert_eq!(first, second);
    assert_eq!(*index.catalog().unwrap(), *before);
}

#[test]
fn test_search_json_shape() {
    let hits = index().search("planned").unwrap();
    let json = serde_json::to_value(&hits).unwrap();

    assert_eq!(
        json,
        serde_json::json!([{
            "cube": "SalesPlan",
            "field": "target",
            "kind": "measure",
            "matched_on": "field_description",
            "description": "Planned revenue"
        }])
    );
}
