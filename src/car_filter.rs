//! Client-side filtering over an already loaded list of cars.

use std::collections::BTreeSet;

use crate::car_model::Car;

/// Every criterion is optional; blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarFilter {
    /// Case-insensitive substring over brand, model, plate and color.
    pub search: Option<String>,
    /// Exact year.
    pub year: Option<String>,
    /// Case-insensitive brand equality.
    pub brand: Option<String>,
}

impl CarFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn matches(&self, car: &Car) -> bool {
        if let Some(search) = non_blank(&self.search) {
            let needle = search.trim().to_lowercase();
            let hit = [&car.brand, &car.model, &car.plate_number, &car.color]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(year) = non_blank(&self.year) {
            if car.year != year {
                return false;
            }
        }

        if let Some(brand) = non_blank(&self.brand) {
            if car.brand.to_lowercase() != brand.to_lowercase() {
                return false;
            }
        }

        true
    }

    /// Matching cars, in their original order.
    pub fn apply(&self, cars: &[Car]) -> Vec<Car> {
        cars.iter().filter(|car| self.matches(car)).cloned().collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.trim().is_empty())
}

/// Distinct brands, ascending.
pub fn brand_options(cars: &[Car]) -> Vec<String> {
    cars.iter()
        .map(|car| car.brand.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years, newest first.
pub fn year_options(cars: &[Car]) -> Vec<String> {
    cars.iter()
        .map(|car| car.year.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}
