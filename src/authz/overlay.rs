use uuid::Uuid;

use crate::models::DepartmentHeadAssignment;

/// Department-head capability set carried by an [`super::AccessContext`].
///
/// A head assignment grants scope over one (department, region) pair; the
/// set is consulted by every resolver as a union with the base-role result
/// and never widens entities outside its pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadOverlay {
    pairs: Vec<(Uuid, Uuid)>,
}

impl HeadOverlay {
    pub fn new(assignments: &[DepartmentHeadAssignment]) -> Self {
        let mut pairs: Vec<(Uuid, Uuid)> = assignments
            .iter()
            .map(|a| (a.department_id, a.region_id))
            .collect();
        pairs.sort();
        pairs.dedup();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// (department_id, region_id) pairs, deduplicated.
    pub fn pairs(&self) -> &[(Uuid, Uuid)] {
        &self.pairs
    }

    pub fn covers(&self, department_id: Uuid, region_id: Uuid) -> bool {
        self.pairs.contains(&(department_id, region_id))
    }

    /// Whether any assignment sits in the given region. Used in create
    /// flows, where the department match is established at contract level.
    pub fn covers_region(&self, region_id: Uuid) -> bool {
        self.pairs.iter().any(|(_, r)| *r == region_id)
    }

    /// Whether a task in `region_id` filed under `departments` intersects
    /// one of the head's assignments.
    pub fn covers_task(&self, departments: &[Uuid], region_id: Uuid) -> bool {
        self.pairs
            .iter()
            .any(|(d, r)| *r == region_id && departments.contains(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn assignment(department_id: Uuid, region_id: Uuid) -> DepartmentHeadAssignment {
        DepartmentHeadAssignment {
            user_id: Uuid::new_v4(),
            department_id,
            region_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn duplicate_pairs_collapse() {
        let dept = Uuid::new_v4();
        let region = Uuid::new_v4();
        let overlay = HeadOverlay::new(&[assignment(dept, region), assignment(dept, region)]);
        assert_eq!(overlay.pairs().len(), 1);
    }

    #[test]
    fn task_match_requires_region_and_department_together() {
        let dept = Uuid::new_v4();
        let region_a = Uuid::new_v4();
        let region_b = Uuid::new_v4();
        let overlay = HeadOverlay::new(&[assignment(dept, region_a)]);

        assert!(overlay.covers_task(&[dept], region_a));
        // same department, wrong region
        assert!(!overlay.covers_task(&[dept], region_b));
        // right region, unrelated department
        assert!(!overlay.covers_task(&[Uuid::new_v4()], region_a));
        assert!(!overlay.covers_task(&[], region_a));
    }

    #[test]
    fn region_cover_ignores_department() {
        let region = Uuid::new_v4();
        let overlay = HeadOverlay::new(&[assignment(Uuid::new_v4(), region)]);
        assert!(overlay.covers_region(region));
        assert!(!overlay.covers_region(Uuid::new_v4()));
    }
}
