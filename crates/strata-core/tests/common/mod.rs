use strata_core::model::{BuildingSpec, ResolvedSnapshot, SpecStatus};

/// A spec with every tracked field populated
#[allow(dead_code)]
pub fn full_spec(id: &str, name: &str) -> BuildingSpec {
    BuildingSpec::new(id, name)
        .unwrap()
        .with_style("Beaux-Arts")
        .with_roof_height(40.0)
        .with_stories(8)
        .with_status(SpecStatus::Existing)
        .with_years(Some(1901), Some(1904))
}

/// A spec with only id and name
#[allow(dead_code)]
pub fn bare_spec(id: &str) -> BuildingSpec {
    BuildingSpec::new(id, format!("Building {id}")).unwrap()
}

#[allow(dead_code)]
pub fn snapshot(id: &str, year: i32, specs: Vec<BuildingSpec>) -> ResolvedSnapshot {
    ResolvedSnapshot::new(id, year).with_specs(specs)
}
