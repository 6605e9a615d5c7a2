use crate::{Category, EmissionInventory, EmissionRecord, Error, Inventory, Pollutant};
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Mapping from group name (e.g. `GNFR_F`) to its ordered member categories.
///
/// A category belongs to at most one group. Mappings are never edited in
/// place: [`reconcile`](Self::reconcile) derives a new one per vintage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMapping {
    groups: BTreeMap<Category, Vec<Category>>,
}

impl GroupMapping {
    pub fn new(groups: BTreeMap<Category, Vec<Category>>) -> Result<Self, Error> {
        if let Some(dup) = groups.values().flatten().duplicates().next() {
            return Err(Error::DuplicateCategory(dup.clone()));
        }
        Ok(Self { groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&Category, &[Category])> + '_ {
        self.groups.iter().map(|(g, members)| (g, members.as_slice()))
    }

    pub fn members(&self, group: &str) -> Option<&[Category]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Group containing `category`, if any.
    pub fn group_of(&self, category: &str) -> Option<&Category> {
        self.groups()
            .find(|(_, members)| members.iter().any(|m| m.as_str() == category))
            .map(|(group, _)| group)
    }

    /// Derive the mapping of a vintage.
    ///
    /// Removals are applied first, then dropped groups, then additions, so a
    /// category may move between groups within one set of changes.
    pub fn reconcile(&self, changes: &VintageChanges) -> Result<Self, Error> {
        let mut groups = self.groups.clone();

        for (group, removed) in &changes.remove {
            let members = groups
                .get_mut(group)
                .ok_or_else(|| Error::UnknownGroup(group.clone()))?;
            for category in removed {
                let pos = members.iter().position(|m| m == category).ok_or_else(|| {
                    Error::CategoryNotInGroup {
                        group: group.clone(),
                        category: category.clone(),
                    }
                })?;
                members.remove(pos);
            }
        }

        for group in &changes.drop_groups {
            groups
                .remove(group)
                .ok_or_else(|| Error::UnknownGroup(group.clone()))?;
        }

        for (group, added) in &changes.add {
            if !groups.contains_key(group) {
                return Err(Error::UnknownGroup(group.clone()));
            }
            for category in added {
                if groups.values().flatten().contains(category) {
                    return Err(Error::DuplicateCategory(category.clone()));
                }
                if let Some(members) = groups.get_mut(group) {
                    members.push(category.clone());
                }
            }
        }

        debug!(
            removed = changes.remove.values().map(Vec::len).sum::<usize>(),
            added = changes.add.values().map(Vec::len).sum::<usize>(),
            dropped = changes.drop_groups.len(),
            "reconciled group mapping"
        );

        Ok(Self { groups })
    }

    /// Check that every inventory category belongs to a group and every
    /// grouped category exists in the inventory.
    pub fn validate(&self, inv: &impl EmissionInventory) -> Result<(), Error> {
        let present = inv.categories();
        let index = self.member_index();

        if let Some(orphan) = present.iter().find(|c| !index.contains_key(c.as_str())) {
            return Err(Error::UngroupedCategory((*orphan).clone()));
        }

        for (group, members) in self.groups() {
            if let Some(missing) = members.iter().find(|m| !present.contains(m)) {
                return Err(Error::UnmappedCategory {
                    group: group.clone(),
                    category: missing.clone(),
                });
            }
        }

        Ok(())
    }

    fn member_index(&self) -> HashMap<&str, &Category> {
        self.groups()
            .flat_map(|(group, members)| members.iter().map(move |m| (m.as_str(), group)))
            .collect()
    }
}

impl TryFrom<&BTreeMap<String, Vec<String>>> for GroupMapping {
    type Error = Error;

    fn try_from(groups: &BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        Self::new(
            groups
                .iter()
                .map(|(g, members)| {
                    (
                        Category::new(g.as_str()),
                        members.iter().map(|m| Category::new(m.as_str())).collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Categories added and removed between vintages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VintageChanges {
    pub add: BTreeMap<Category, Vec<Category>>,
    pub remove: BTreeMap<Category, Vec<Category>>,
    pub drop_groups: Vec<Category>,
}

impl From<&config::CategoryChanges> for VintageChanges {
    fn from(changes: &config::CategoryChanges) -> Self {
        let convert = |map: &BTreeMap<String, Vec<String>>| {
            map.iter()
                .map(|(g, cats)| {
                    (
                        Category::new(g.as_str()),
                        cats.iter().map(|c| Category::new(c.as_str())).collect(),
                    )
                })
                .collect()
        };
        Self {
            add: convert(&changes.add),
            remove: convert(&changes.remove),
            drop_groups: changes
                .drop_groups
                .iter()
                .map(|g| Category::new(g.as_str()))
                .collect(),
        }
    }
}

/// Regroup an inventory by `mapping`, summing member records per group,
/// pollutant, cell and facility.
pub fn group_categories(
    inv: &impl EmissionInventory,
    mapping: &GroupMapping,
) -> Result<Inventory, Error> {
    mapping.validate(inv)?;
    let index = mapping.member_index();

    type Key<'a> = (&'a Category, &'a Pollutant, Option<u64>, Option<&'a str>);
    let mut sums: BTreeMap<Key<'_>, f64> = BTreeMap::new();
    for record in inv.records() {
        let group = index
            .get(record.category.as_str())
            .ok_or_else(|| Error::UngroupedCategory(record.category.clone()))?;
        let key = (
            *group,
            &record.pollutant,
            record.cell,
            record.facility.as_deref(),
        );
        *sums.entry(key).or_insert(0.0) += record.value;
    }

    let records = sums
        .into_iter()
        .map(|((group, pollutant, cell, facility), value)| EmissionRecord {
            category: group.clone(),
            pollutant: pollutant.clone(),
            value,
            cell,
            facility: facility.map(str::to_owned),
        })
        .collect::<Vec<_>>();

    debug!(
        year = inv.year(),
        groups = mapping.len(),
        records = records.len(),
        "grouped inventory"
    );

    Ok(Inventory::from_parts(inv.year(), records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn base_mapping() -> GroupMapping {
        GroupMapping::new(BTreeMap::from([
            ("GNFR_C".into(), vec!["heating_oil".into(), "heating_gas".into()]),
            ("GNFR_F".into(), vec!["cars".into(), "trucks".into()]),
            ("GNFR_J".into(), vec!["incinerator".into()]),
        ]))
        .unwrap()
    }

    fn changes() -> VintageChanges {
        VintageChanges {
            add: BTreeMap::from([("GNFR_F".into(), vec!["e_bikes".into()])]),
            remove: BTreeMap::from([("GNFR_C".into(), vec!["heating_oil".into()])]),
            drop_groups: vec!["GNFR_J".into()],
        }
    }

    #[test]
    fn reconcile_appends_removes_and_drops() {
        let reconciled = base_mapping().reconcile(&changes()).unwrap();

        assert_eq!(
            reconciled.members("GNFR_F").unwrap(),
            &[
                Category::from("cars"),
                Category::from("trucks"),
                Category::from("e_bikes")
            ]
        );
        assert_eq!(
            reconciled.members("GNFR_C").unwrap(),
            &[Category::from("heating_gas")]
        );
        assert!(reconciled.members("GNFR_J").is_none());
    }

    #[test]
    fn reconcile_leaves_base_untouched() {
        let base = base_mapping();
        let snapshot = base.clone();

        let year_a = base.reconcile(&changes()).unwrap();
        let year_b = base.reconcile(&VintageChanges::default()).unwrap();

        assert_eq!(base, snapshot);
        assert_eq!(year_b, snapshot);
        assert_ne!(year_a, year_b);
    }

    #[test]
    fn reconcile_moves_category_between_groups() {
        let changes = VintageChanges {
            add: BTreeMap::from([("GNFR_C".into(), vec!["trucks".into()])]),
            remove: BTreeMap::from([("GNFR_F".into(), vec!["trucks".into()])]),
            drop_groups: Vec::new(),
        };
        let reconciled = base_mapping().reconcile(&changes).unwrap();
        assert_eq!(reconciled.group_of("trucks").unwrap().as_str(), "GNFR_C");
    }

    #[test]
    fn reconcile_rejects_absent_category() {
        let changes = VintageChanges {
            remove: BTreeMap::from([("GNFR_F".into(), vec!["trams".into()])]),
            ..Default::default()
        };
        let err = base_mapping().reconcile(&changes).unwrap_err();
        assert!(matches!(err, Error::CategoryNotInGroup { category, .. } if category.as_str() == "trams"));
    }

    #[test]
    fn reconcile_rejects_unknown_group() {
        let changes = VintageChanges {
            drop_groups: vec!["GNFR_Z".into()],
            ..Default::default()
        };
        assert!(matches!(
            base_mapping().reconcile(&changes),
            Err(Error::UnknownGroup(g)) if g.as_str() == "GNFR_Z"
        ));
    }

    #[test]
    fn reconcile_rejects_duplicate_addition() {
        let changes = VintageChanges {
            add: BTreeMap::from([("GNFR_C".into(), vec!["cars".into()])]),
            ..Default::default()
        };
        assert!(matches!(
            base_mapping().reconcile(&changes),
            Err(Error::DuplicateCategory(c)) if c.as_str() == "cars"
        ));
    }

    #[test]
    fn new_rejects_category_in_two_groups() {
        let groups = BTreeMap::from([
            ("A".into(), vec!["x".into()]),
            ("B".into(), vec!["x".into()]),
        ]);
        assert!(matches!(
            GroupMapping::new(groups),
            Err(Error::DuplicateCategory(_))
        ));
    }

    #[test]
    fn grouping_sums_members_per_cell() {
        let inv = Inventory::new(
            2020,
            vec![
                EmissionRecord::new("cars", "CO2", 10.0).with_cell(1),
                EmissionRecord::new("trucks", "CO2", 5.0).with_cell(1),
                EmissionRecord::new("trucks", "CO2", 2.0).with_cell(2),
                EmissionRecord::new("heating_oil", "CO2", 7.0),
                EmissionRecord::new("heating_gas", "CO2", 3.0),
                EmissionRecord::new("incinerator", "CO2", 90.0).with_facility("KVA"),
            ],
        )
        .unwrap();

        let grouped = group_categories(&inv, &base_mapping()).unwrap();
        let values: Vec<_> = grouped
            .records()
            .iter()
            .map(|r| (r.category.as_str(), r.cell, r.value))
            .collect();

        assert_eq!(
            values,
            [
                ("GNFR_C", None, 10.0),
                ("GNFR_F", Some(1), 15.0),
                ("GNFR_F", Some(2), 2.0),
                ("GNFR_J", None, 90.0),
            ]
        );
        assert_eq!(grouped.records()[3].facility.as_deref(), Some("KVA"));
    }

    #[test]
    fn grouping_requires_full_coverage() {
        let inv = Inventory::new(2020, vec![EmissionRecord::new("ships", "CO2", 1.0)]).unwrap();
        assert!(matches!(
            group_categories(&inv, &base_mapping()),
            Err(Error::UngroupedCategory(c)) if c.as_str() == "ships"
        ));

        let inv = Inventory::new(2020, vec![EmissionRecord::new("cars", "CO2", 1.0)]).unwrap();
        assert!(matches!(
            base_mapping().validate(&inv),
            Err(Error::UnmappedCategory { .. })
        ));
    }

    proptest! {
        #[test]
        fn reconcile_never_mutates_base(extra in "[a-z]{3,8}") {
            prop_assume!(base_mapping().group_of(&extra).is_none());
            let base = base_mapping();
            let changes = VintageChanges {
                add: BTreeMap::from([("GNFR_J".into(), vec![Category::new(extra.clone())])]),
                ..Default::default()
            };
            let derived = base.reconcile(&changes).unwrap();
            prop_assert!(base.group_of(&extra).is_none());
            prop_assert_eq!(derived.group_of(&extra).map(Category::as_str), Some("GNFR_J"));
        }
    }
}
