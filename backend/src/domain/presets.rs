//! The preset catalog every new user starts with.

/// One category of the preset catalog and the subcategories seeded under it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetEntry {
    pub name: &'static str,
    pub subcategories: &'static [&'static str],
}

pub const PRESET_CATEGORIES: &[PresetEntry] = &[
    PresetEntry {
        name: "Food & Dining",
        subcategories: &["Groceries", "Restaurants", "Coffee", "Snacks", "Food Delivery"],
    },
    PresetEntry {
        name: "Transportation",
        subcategories: &["Fuel", "Public Transport", "Taxi & Ride Share", "Parking", "Vehicle Maintenance"],
    },
    PresetEntry {
        name: "Housing",
        subcategories: &["Rent", "Maintenance", "Home Supplies", "Furniture"],
    },
    PresetEntry {
        name: "Utilities",
        subcategories: &["Electricity", "Water", "Gas", "Internet", "Mobile"],
    },
    PresetEntry {
        name: "Shopping",
        subcategories: &["Clothing", "Electronics", "Personal Care", "Gifts"],
    },
    PresetEntry {
        name: "Health",
        subcategories: &["Medicines", "Doctor", "Insurance", "Fitness"],
    },
    PresetEntry {
        name: "Entertainment",
        subcategories: &["Movies", "Subscriptions", "Games", "Events"],
    },
    PresetEntry {
        name: "Travel",
        subcategories: &["Flights", "Hotels", "Trains", "Sightseeing"],
    },
    PresetEntry {
        name: "Education",
        subcategories: &["Tuition", "Books", "Courses"],
    },
    PresetEntry {
        name: "Bills & EMIs",
        subcategories: &["Loan EMI", "Credit Card Bill", "Taxes"],
    },
    PresetEntry {
        name: "Miscellaneous",
        subcategories: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_category_names_are_unique() {
        let names: HashSet<&str> = PRESET_CATEGORIES.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), PRESET_CATEGORIES.len());
    }

    #[test]
    fn test_subcategory_names_are_unique_within_a_category() {
        for preset in PRESET_CATEGORIES {
            let names: HashSet<&str> = preset.subcategories.iter().copied().collect();
            assert_eq!(names.len(), preset.subcategories.len(), "duplicate in {}", preset.name);
        }
    }

    #[test]
    fn test_housing_and_miscellaneous_entries() {
        let housing = PRESET_CATEGORIES.iter().find(|p| p.name == "Housing").unwrap();
        assert_eq!(housing.subcategories, &["Rent", "Maintenance", "Home Supplies", "Furniture"]);
        let misc = PRESET_CATEGORIES.iter().find(|p| p.name == "Miscellaneous").unwrap();
        assert!(misc.subcategories.is_empty());
    }
}
