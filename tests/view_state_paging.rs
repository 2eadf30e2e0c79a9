use demandsearch::model::{EntityKey, Product};
use demandsearch::view::ViewState;

fn keys(n: usize) -> Vec<EntityKey> {
    (1..=n).map(|i| EntityKey::new(format!("P{i:02}"), "C1", "L1")).collect()
}

fn product(id: &str, descr: &str, unit: &str, is_new: &str) -> Product {
    Product {
        product_id: id.into(),
        product_descr: descr.into(),
        business_unit: unit.into(),
        is_new: is_new.into(),
        ..Product::default()
    }
}

#[test]
fn page_is_clamped() {
    let mut view: ViewState<EntityKey> = ViewState::new(5);
    assert_eq!(view.total_pages(), 1, "empty view still has one page");
    view.load(keys(12));
    assert_eq!(view.total_pages(), 3);
    view.set_page(0);
    assert_eq!(view.current_page(), 1);
    view.set_page(99);
    assert_eq!(view.current_page(), 3);
    assert_eq!(view.page().len(), 2);
    assert_eq!(view.page()[0].product_id, "P11");

    view.apply_local_filters([("ProductID", "p0")]);
    assert_eq!(view.filtered_rows().len(), 9);
    assert_eq!(view.current_page(), 1, "filtering starts over");
    view.set_page(2);
    view.apply_local_filters([("productid", "P12")]);
    assert_eq!(view.total_pages(), 1);
    assert_eq!(view.current_page(), 1);
}

#[test]
fn load_resets_to_first_page() {
    let mut view = ViewState::new(5);
    view.load(keys(20));
    view.set_page(4);
    view.load(keys(20));
    assert_eq!(view.current_page(), 1);
}

#[test]
fn page_size_change_clamps() {
    let mut view = ViewState::new(5);
    view.load(keys(20));
    view.set_page(4);
    view.set_items_per_page(10);
    assert_eq!(view.current_page(), 2);
    view.set_items_per_page(0);
    assert_eq!(view.items_per_page(), 1);
}

#[test]
fn visible_pages_window() {
    let mut view = ViewState::new(1);
    view.load(keys(3));
    assert_eq!(view.visible_pages(), vec![1, 2, 3]);
    view.load(keys(10));
    assert_eq!(view.visible_pages(), vec![1, 2, 3, 4, 5]);
    view.set_page(6);
    assert_eq!(view.visible_pages(), vec![4, 5, 6, 7, 8]);
    view.set_page(10);
    assert_eq!(view.visible_pages(), vec![6, 7, 8, 9, 10]);
    assert_eq!(view.page_range().len(), 10);
}

#[test]
fn sort_toggles_and_ignores_case() {
    let mut view = ViewState::new(10);
    view.load(vec![
        product("P1", "banana", "", ""),
        product("P2", "Apple", "", ""),
        product("P3", "cherry", "", ""),
        product("P4", "apple", "", ""),
    ]);
    assert!(view.sort_by("ProductDescr"));
    let order: Vec<_> = view.filtered_rows().iter().map(|p| p.product_id.as_str()).collect();
    assert_eq!(order, vec!["P2", "P4", "P1", "P3"], "ties keep their prior order");
    assert!(view.sort_ascending());

    assert!(view.sort_by("productdescr"));
    assert!(!view.sort_ascending());
    let order: Vec<_> = view.filtered_rows().iter().map(|p| p.product_id.as_str()).collect();
    assert_eq!(order[..2], ["P3", "P1"]);

    assert!(view.sort_by("ProductID"));
    assert!(view.sort_ascending(), "new column starts ascending");
    assert!(!view.sort_by("Colour"));
    assert_eq!(view.sort_column(), Some("ProductID"));
}

#[test]
fn sort_survives_reload_and_filters() {
    let mut view: ViewState<EntityKey> = ViewState::new(10);
    view.sort_by("ProductID");
    view.sort_by("ProductID");
    view.load(keys(4));
    assert_eq!(view.filtered_rows()[0].product_id, "P04");
    view.apply_local_filters([("LocationID", "l1"), ("ChannelID", "")]);
    assert_eq!(view.filtered_rows()[0].product_id, "P04");
    assert_eq!(view.filters().len(), 1, "blank needles are ignored");
}

#[test]
fn dropdown_filters_match_exactly() {
    let mut view = ViewState::new(5);
    view.load(vec![
        product("P1", "a", "Fast Food", "Yes"),
        product("P2", "b", "Fast Food Plus", "No"),
        product("P3", "c", "Bakery", "Yes"),
    ]);
    assert_eq!(view.distinct_values("BusinessUnit"), vec!["Bakery", "Fast Food", "Fast Food Plus"]);
    view.apply_exact_filters([("BusinessUnit", "Fast Food"), ("IsNew", "")]);
    assert_eq!(view.filtered_rows().len(), 1);
    view.apply_exact_filters([("IsNew", "Yes")]);
    assert_eq!(view.filtered_rows().len(), 2);
    view.clear_filters();
    assert_eq!(view.filtered_rows().len(), 3);
    assert_eq!(view.all_rows().len(), 3);
}

#[test]
fn accented_values_sort_with_their_base_letter() {
    let mut view = ViewState::new(10);
    view.load(vec![
        product("P1", "zebra", "", ""),
        product("P2", "éclair", "", ""),
        product("P3", "apple", "", ""),
        product("P4", "Éclat", "", ""),
    ]);
    view.sort_by("ProductDescr");
    let order: Vec<_> = view.filtered_rows().iter().map(|p| p.product_descr.as_str()).collect();
    assert_eq!(order, vec!["apple", "éclair", "Éclat", "zebra"]);
    view.sort_by("ProductDescr");
    assert_eq!(view.filtered_rows()[3].product_descr, "apple");
    assert_eq!(view.distinct_values("ProductDescr"), vec!["apple", "éclair", "Éclat", "zebra"]);
}
