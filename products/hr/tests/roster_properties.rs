use std::collections::HashSet;

use products_hr::{Employee, EmployeeDraft, HrError, HrModule, Roster};
use proptest::prelude::*;

fn draft_strategy() -> impl Strategy<Value = EmployeeDraft> {
    (
        "[A-Za-z][A-Za-z ]{0,12}",
        "[0-9a-z]{0,4}",
        "[0-9]{0,6}",
        "[A-Za-z ]{0,10}",
    )
        .prop_map(|(name, age, salary, designation)| EmployeeDraft {
            name,
            age,
            salary,
            designation,
        })
}

#[derive(Clone, Debug)]
enum Op {
    Add(EmployeeDraft),
    Remove(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => draft_strategy().prop_map(Op::Add),
        1 => (1u64..12).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn adds_grow_roster_with_distinct_ids(
        drafts in prop::collection::vec(draft_strategy(), 0..40),
    ) {
        let mut roster = Roster::default();
        for draft in &drafts {
            roster.add(draft).unwrap();
        }
        prop_assert_eq!(roster.len(), drafts.len());
        let ids: HashSet<u64> = roster.employees().iter().map(|e| e.id).collect();
        prop_assert_eq!(ids.len(), drafts.len());
    }

    #[test]
    fn ids_stay_unique_under_mixed_edits(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut hr = HrModule::with_sample_roster();
        for op in ops {
            match op {
                Op::Add(draft) => {
                    let expected = hr.roster().next_id().unwrap();
                    hr.replace_draft(draft);
                    prop_assert_eq!(hr.submit().unwrap().id, expected);
                }
                Op::Remove(id) => {
                    let before: Vec<u64> = hr
                        .employees()
                        .iter()
                        .map(|e| e.id)
                        .filter(|e| *e != id)
                        .collect();
                    hr.delete(id);
                    let after: Vec<u64> = hr.employees().iter().map(|e| e.id).collect();
                    prop_assert_eq!(before, after);
                }
            }
            let ids: HashSet<u64> = hr.employees().iter().map(|e| e.id).collect();
            prop_assert_eq!(ids.len(), hr.employees().len());
        }
    }

    #[test]
    fn whitespace_names_never_mutate(name in "[ \t]{0,6}", age in "[0-9]{0,3}") {
        let mut hr = HrModule::with_sample_roster();
        hr.replace_draft(EmployeeDraft { name, age, ..Default::default() });
        let before = hr.roster().clone();
        prop_assert_eq!(hr.submit().unwrap_err(), HrError::MissingName);
        prop_assert_eq!(hr.roster(), &before);
    }
}

#[test]
fn sample_roster_matches_first_page_load() {
    let hr = HrModule::with_sample_roster();
    let names: Vec<&str> = hr.employees().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Ravi Kumar", "Sana Patel", "Amit Sharma"]);
    assert_eq!(
        hr.employees()[1],
        Employee::new(2, "Sana Patel", 25, 38000, "QA Engineer")
    );
}

#[test]
fn raw_state_is_a_plain_json_array() {
    let mut roster = Roster::default();
    roster
        .add(&EmployeeDraft {
            name: "X".into(),
            ..Default::default()
        })
        .unwrap();
    let json = serde_json::to_value(&roster).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{"id": 1, "name": "X", "age": 0, "salary": 0, "designation": "Not set"}])
    );
}
