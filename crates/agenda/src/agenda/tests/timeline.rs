use super::common::*;
use crate::agenda::timeline::{
    group_and_slot, group_and_slot_with, Cluster, OverlapPolicy, TimelineItem,
};

fn member_ids(item: &TimelineItem) -> Vec<&str> {
    item.as_event()
        .expect("event item")
        .appointments()
        .iter()
        .map(|appointment| appointment.id.0.as_str())
        .collect()
}

#[test]
fn empty_input_yields_no_items() {
    assert!(group_and_slot(&[]).is_empty());
}

#[test]
fn disjoint_appointments_alternate_with_gaps() {
    let appointments = vec![
        appointment("c", "prop-3", "u3", at(14, 0), at(14, 30)),
        appointment("a", "prop-1", "u1", at(9, 0), at(10, 0)),
        appointment("b", "prop-2", "u2", at(11, 0), at(12, 0)),
    ];

    let items = group_and_slot(&appointments);

    assert_eq!(items.len(), 5);
    assert_eq!(member_ids(&items[0]), vec!["a"]);
    assert_eq!(
        items[1],
        TimelineItem::Empty {
            start_time: at(10, 0),
            end_time: at(11, 0),
        }
    );
    assert_eq!(member_ids(&items[2]), vec!["b"]);
    assert_eq!(
        items[3],
        TimelineItem::Empty {
            start_time: at(12, 0),
            end_time: at(14, 0),
        }
    );
    assert_eq!(member_ids(&items[4]), vec!["c"]);
    assert!(items.last().and_then(TimelineItem::as_event).is_some());
}

#[test]
fn overlapping_appointments_share_a_cluster() {
    let appointments = vec![
        appointment("a", "prop-1", "u1", at(9, 0), at(10, 0)),
        appointment("b", "prop-1", "u2", at(9, 30), at(10, 30)),
    ];

    let items = group_and_slot(&appointments);

    assert_eq!(items.len(), 1);
    assert_eq!(member_ids(&items[0]), vec!["a", "b"]);
}

#[test]
fn back_to_back_appointments_do_not_overlap_or_leave_a_gap() {
    let appointments = vec![
        appointment("a", "prop-1", "u1", at(9, 0), at(10, 0)),
        appointment("b", "prop-2", "u2", at(10, 0), at(11, 0)),
    ];

    let items = group_and_slot(&appointments);

    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| !item.is_empty_slot()));
    assert_eq!(member_ids(&items[0]), vec!["a"]);
    assert_eq!(member_ids(&items[1]), vec!["b"]);
}

#[test]
fn anchor_policy_only_tests_the_earliest_member() {
    // b extends the cluster past a; c overlaps b but starts after a ends.
    let appointments = vec![
        appointment("a", "prop-1", "u1", at(9, 0), at(10, 0)),
        appointment("b", "prop-1", "u2", at(9, 30), at(11, 0)),
        appointment("c", "prop-2", "u3", at(10, 15), at(10, 45)),
    ];

    let items = group_and_slot_with(&appointments, OverlapPolicy::AnchorOnly);

    assert_eq!(items.len(), 2);
    assert_eq!(member_ids(&items[0]), vec!["a", "b"]);
    assert_eq!(member_ids(&items[1]), vec!["c"]);
}

#[test]
fn running_end_policy_follows_the_latest_member() {
    let appointments = vec![
        appointment("a", "prop-1", "u1", at(9, 0), at(10, 0)),
        appointment("b", "prop-1", "u2", at(9, 30), at(11, 0)),
        appointment("c", "prop-2", "u3", at(10, 15), at(10, 45)),
    ];

    let items = group_and_slot_with(&appointments, OverlapPolicy::RunningEnd);

    assert_eq!(items.len(), 1);
    assert_eq!(member_ids(&items[0]), vec!["a", "b", "c"]);
}

#[test]
fn gap_starts_after_latest_finishing_member() {
    let appointments = vec![
        appointment("a", "prop-1", "u1", at(9, 0), at(11, 0)),
        appointment("b", "prop-1", "u2", at(9, 30), at(10, 0)),
        appointment("c", "prop-2", "u3", at(12, 0), at(13, 0)),
    ];

    let items = group_and_slot(&appointments);

    assert_eq!(items.len(), 3);
    assert_eq!(
        items[1],
        TimelineItem::Empty {
            start_time: at(11, 0),
            end_time: at(12, 0),
        }
    );
}

#[test]
fn watermark_never_moves_backwards_between_clusters() {
    // c starts a new cluster (after a ends) but is still covered by b.
    let appointments = vec![
        appointment("a", "prop-1", "u1", at(9, 0), at(10, 0)),
        appointment("b", "prop-1", "u2", at(9, 30), at(13, 0)),
        appointment("c", "prop-2", "u3", at(11, 0), at(11, 30)),
        appointment("d", "prop-3", "u4", at(12, 0), at(12, 30)),
    ];

    let items = group_and_slot(&appointments);

    assert!(items.iter().all(|item| !item.is_empty_slot()));
    assert_eq!(items.len(), 3);
}

#[test]
fn equal_start_times_are_ordered_by_id() {
    let forward = vec![
        appointment("b", "prop-1", "u2", at(9, 0), at(10, 0)),
        appointment("a", "prop-2", "u1", at(9, 0), at(10, 0)),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let left = group_and_slot(&forward);
    let right = group_and_slot(&reversed);

    assert_eq!(left, right);
    assert_eq!(member_ids(&left[0]), vec!["a", "b"]);
}

#[test]
fn grouping_does_not_mutate_input() {
    let appointments = vec![
        appointment("b", "prop-1", "u2", at(11, 0), at(12, 0)),
        appointment("a", "prop-1", "u1", at(9, 0), at(10, 0)),
    ];
    let before = appointments.clone();

    let _ = group_and_slot(&appointments);

    assert_eq!(appointments, before);
}

#[test]
fn cluster_rejects_empty_members_and_reports_span() {
    assert!(Cluster::new(Vec::new()).is_none());

    let cluster = Cluster::new(vec![
        appointment("a", "prop-1", "u1", at(9, 0), at(11, 0)),
        appointment("b", "prop-1", "u2", at(9, 30), at(10, 0)),
    ])
    .expect("non-empty cluster");

    assert_eq!(cluster.start_time(), at(9, 0));
    assert_eq!(cluster.end_time(), at(11, 0));
    assert_eq!(cluster.clients().len(), 2);
}

#[test]
fn overlap_policy_parses_config_values() {
    assert_eq!(OverlapPolicy::parse("anchor"), Some(OverlapPolicy::AnchorOnly));
    assert_eq!(OverlapPolicy::parse(" RUNNING "), Some(OverlapPolicy::RunningEnd));
    assert_eq!(OverlapPolicy::parse("whatever"), None);
}
