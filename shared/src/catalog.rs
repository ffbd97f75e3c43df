/// A selectable facet value with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    pub label: &'static str,
    pub value: &'static str,
}

const fn item(label: &'static str, value: &'static str) -> CatalogItem {
    CatalogItem { label, value }
}

pub const BADGES: &[CatalogItem] = &[
    item("Regenerative Organic Certified", "roc"),
    item("USDA Organic", "usda_o"),
    item("Certified Humane", "hum"),
    item("Patagonia Provisions", "patagonia"),
];

pub const TAGS: &[CatalogItem] = &[
    item("Beef", "beef"),
    item("Pork", "pork"),
    item("Fish", "fish"),
    item("Produce", "produce"),
    item("Poultry", "poultry"),
    item("Dairy", "dairy"),
    item("Grains", "grains"),
    item("Shellfish", "shellfish"),
    item("Honey", "honey"),
    item("Wine", "wine"),
    item("Beer", "beer"),
];

pub const TAG_ICON_DIR: &str = "/public/images/icons";

fn label_in(table: &[CatalogItem], value: &str) -> Option<&'static str> {
    table.iter().find(|i| i.value == value).map(|i| i.label)
}

pub fn badge_label(value: &str) -> Option<&'static str> {
    label_in(BADGES, value)
}

pub fn tag_label(value: &str) -> Option<&'static str> {
    label_in(TAGS, value)
}

/// Icon asset for a tag. Unknown tags have no icon and render nothing.
pub fn tag_icon(tag: &str) -> Option<&'static str> {
    match tag {
        "beef" => Some("/public/images/icons/beef.svg"),
        "pork" => Some("/public/images/icons/pork.svg"),
        "fish" => Some("/public/images/icons/fish.svg"),
        "produce" => Some("/public/images/icons/produce.svg"),
        "poultry" => Some("/public/images/icons/poultry.svg"),
        "dairy" => Some("/public/images/icons/dairy.svg"),
        "grains" => Some("/public/images/icons/grains.svg"),
        "shellfish" => Some("/public/images/icons/shellfish.svg"),
        "honey" => Some("/public/images/icons/honey.svg"),
        "wine" => Some("/public/images/icons/wine.svg"),
        "beer" => Some("/public/images/icons/beer.svg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_tag_has_an_icon() {
        for tag in TAGS {
            let icon = tag_icon(tag.value).unwrap_or_else(|| panic!("no icon for {}", tag.value));
            assert!(icon.starts_with(TAG_ICON_DIR));
            assert!(icon.ends_with(&format!("{}.svg", tag.value)));
        }
    }

    #[test]
    fn unknown_values_have_no_label_or_icon() {
        assert_eq!(tag_icon("kombucha"), None);
        assert_eq!(tag_label("kombucha"), None);
        assert_eq!(badge_label("fair"), None);
    }

    #[test]
    fn labels_resolve() {
        assert_eq!(badge_label("usda_o"), Some("USDA Organic"));
        assert_eq!(tag_label("shellfish"), Some("Shellfish"));
    }
}
