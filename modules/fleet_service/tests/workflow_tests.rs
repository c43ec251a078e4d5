//! Work-assignment fan-out and the submission lifecycle

mod common;

use common::{print_test_header, TestFleet};
use fleet_service::contract::{
    AssigneeSelector, FleetError, FormCategory, SubmissionStatus, SubmissionUpdate,
    TemplateSelector, WorkOrder,
};
use fleet_service::domain::repository::Record;
use fleet_service::contract::FormSubmission;
use serde_json::json;

fn order(vessel_id: &str, templates: TemplateSelector, assignees: AssigneeSelector) -> WorkOrder {
    WorkOrder {
        vessel_id: vessel_id.to_owned(),
        templates,
        assignees,
        due_date: None,
    }
}

fn stored_submissions(fleet: &TestFleet) -> usize {
    fleet.store.len(FormSubmission::COLLECTION)
}

#[tokio::test]
async fn test_fanout_creates_one_submission_per_template_and_assignee() {
    print_test_header(
        "test_fanout_creates_one_submission_per_template_and_assignee",
        &["2 templates x 2 named crew members -> 4 pending submissions"],
    );
    let fleet = TestFleet::new().await;
    let t1 = fleet.template("Fire drill", FormCategory::Ism).await;
    let t2 = fleet.template("Engine log", FormCategory::Report).await;
    let crew: Vec<String> = fleet.aurora_crew[..2].iter().map(|c| c.user_id.clone()).collect();

    let created = fleet
        .services
        .fanout
        .trigger_work(
            &fleet.aurora_staff,
            order(
                &fleet.aurora.id,
                TemplateSelector::Ids(vec![t1.id.clone(), t2.id.clone()]),
                AssigneeSelector::Users(crew.clone()),
            ),
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 4);
    assert_eq!(stored_submissions(&fleet), 4);
    for template in [&t1, &t2] {
        for assignee in &crew {
            assert!(created.iter().any(|s| s.template_id == template.id
                && s.assigned_to.as_deref() == Some(assignee.as_str())));
        }
    }
    for submission in &created {
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.vessel_name, "MV Aurora");
        assert_eq!(submission.assigned_by, fleet.aurora_staff.user_id);
        assert!(submission.filled_data.is_empty());
        assert!(submission.submitted_at.is_none());
    }
}

#[tokio::test]
async fn test_fanout_to_all_crew_by_category() {
    let fleet = TestFleet::new().await;
    let checklist = fleet.template("Bridge checklist", FormCategory::Checklist).await;
    fleet.template("Monthly report", FormCategory::Report).await;

    let created = fleet
        .services
        .fanout
        .trigger_work(
            &fleet.master,
            order(
                &fleet.aurora.id,
                TemplateSelector::Category(FormCategory::Checklist),
                AssigneeSelector::AllCrewOnVessel,
            ),
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|s| s.template_id == checklist.id));
    let mut names: Vec<_> = created
        .iter()
        .filter_map(|s| s.assigned_to_name.clone())
        .collect();
    names.sort();
    assert_eq!(names, ["Aurora Cook", "Aurora Deckhand", "Aurora Oiler"]);
}

#[tokio::test]
async fn test_fanout_without_assignees_creates_vessel_wide_copy() {
    let fleet = TestFleet::new().await;
    let template = fleet.template("Garbage log", FormCategory::Report).await;

    let created = fleet
        .services
        .fanout
        .trigger_work(
            &fleet.master,
            order(
                &fleet.borealis.id,
                TemplateSelector::Ids(vec![template.id.clone()]),
                AssigneeSelector::Unassigned,
            ),
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert!(created[0].assigned_to.is_none());
}

#[tokio::test]
async fn test_fanout_with_no_matching_templates_writes_nothing() {
    print_test_header(
        "test_fanout_with_no_matching_templates_writes_nothing",
        &["Unknown template ids or an empty category -> NotFound, zero writes"],
    );
    let fleet = TestFleet::new().await;
    fleet.template("Engine log", FormCategory::Report).await;

    let by_id = fleet
        .services
        .fanout
        .trigger_work(
            &fleet.master,
            order(
                &fleet.aurora.id,
                TemplateSelector::Ids(vec!["missing".to_owned()]),
                AssigneeSelector::AllCrewOnVessel,
            ),
        )
        .await;
    assert!(matches!(by_id, Err(FleetError::NotFound { .. })));

    let by_category = fleet
        .services
        .fanout
        .trigger_work(
            &fleet.master,
            order(
                &fleet.aurora.id,
                TemplateSelector::Category(FormCategory::Hr),
                AssigneeSelector::AllCrewOnVessel,
            ),
        )
        .await;
    assert!(matches!(by_category, Err(FleetError::NotFound { .. })));
    assert_eq!(stored_submissions(&fleet), 0);
}

#[tokio::test]
async fn test_fanout_checks_role_and_vessel() {
    let fleet = TestFleet::new().await;
    let template = fleet.template("Engine log", FormCategory::Report).await;
    let ids = TemplateSelector::Ids(vec![template.id.clone()]);

    assert!(matches!(
        fleet
            .services
            .fanout
            .trigger_work(
                &fleet.aurora_crew[0],
                order(&fleet.aurora.id, ids.clone(), AssigneeSelector::Unassigned),
            )
            .await,
        Err(FleetError::Forbidden { .. })
    ));
    assert!(matches!(
        fleet
            .services
            .fanout
            .trigger_work(
                &fleet.master,
                order("no-such-ship", ids, AssigneeSelector::Unassigned),
            )
            .await,
        Err(FleetError::NotFound { .. })
    ));
    assert_eq!(stored_submissions(&fleet), 0);
}

async fn single_assignment(fleet: &TestFleet) -> FormSubmission {
    let template = fleet.template("Fire drill", FormCategory::Ism).await;
    fleet
        .services
        .fanout
        .trigger_work(
            &fleet.master,
            order(
                &fleet.aurora.id,
                TemplateSelector::Ids(vec![template.id]),
                AssigneeSelector::Users(vec![fleet.aurora_crew[0].user_id.clone()]),
            ),
        )
        .await
        .unwrap()
        .remove(0)
}

fn submit_with(data: serde_json::Value) -> SubmissionUpdate {
    SubmissionUpdate {
        filled_data: Some(serde_json::from_value(data).unwrap()),
        status: Some(SubmissionStatus::Submitted),
        approval_notes: None,
    }
}

#[tokio::test]
async fn test_submission_lifecycle_submit_then_approve() {
    print_test_header(
        "test_submission_lifecycle_submit_then_approve",
        &["PENDING -> SUBMITTED by the assignee -> APPROVED by MASTER"],
    );
    let fleet = TestFleet::new().await;
    let assigned = single_assignment(&fleet).await;
    let assignee = &fleet.aurora_crew[0];

    let submitted = fleet
        .services
        .submissions
        .update(assignee, &assigned.id, submit_with(json!({"checked": true, "remarks": "ok"})))
        .await
        .unwrap();
    assert_eq!(submitted.status, SubmissionStatus::Submitted);
    assert_eq!(submitted.submitted_by.as_deref(), Some(assignee.user_id.as_str()));
    assert!(submitted.submitted_at.is_some());
    assert_eq!(submitted.filled_data["remarks"], json!("ok"));

    // Reads are idempotent
    let first = fleet.services.submissions.get(assignee, &assigned.id).await.unwrap();
    let second = fleet.services.submissions.get(assignee, &assigned.id).await.unwrap();
    assert_eq!(first, second);

    assert!(matches!(
        fleet
            .services
            .submissions
            .approve(&fleet.aurora_staff, &assigned.id, None)
            .await,
        Err(FleetError::Forbidden { .. })
    ));

    let approved = fleet
        .services
        .submissions
        .approve(&fleet.master, &assigned.id, Some("Well done".to_owned()))
        .await
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);
    assert_eq!(approved.reviewed_by.as_deref(), Some(fleet.master.user_id.as_str()));
    assert_eq!(approved.approval_notes.as_deref(), Some("Well done"));

    // Terminal
    assert!(matches!(
        fleet
            .services
            .submissions
            .update(&fleet.master, &assigned.id, SubmissionUpdate::default())
            .await,
        Err(FleetError::Validation { .. })
    ));
    assert!(matches!(
        fleet
            .services
            .submissions
            .reject(&fleet.master, &assigned.id, None)
            .await,
        Err(FleetError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_resubmitting_keeps_original_submitter() {
    print_test_header(
        "test_resubmitting_keeps_original_submitter",
        &["STAFF editing a SUBMITTED form with status submitted keeps the crew member's stamp"],
    );
    let fleet = TestFleet::new().await;
    let assigned = single_assignment(&fleet).await;
    let assignee = &fleet.aurora_crew[0];

    let submitted = fleet
        .services
        .submissions
        .update(assignee, &assigned.id, submit_with(json!({"checked": true})))
        .await
        .unwrap();

    let edited = fleet
        .services
        .submissions
        .update(
            &fleet.aurora_staff,
            &assigned.id,
            submit_with(json!({"checked": true, "remarks": "countersigned"})),
        )
        .await
        .unwrap();
    assert_eq!(edited.status, SubmissionStatus::Submitted);
    assert_eq!(edited.submitted_by.as_deref(), Some(assignee.user_id.as_str()));
    assert_eq!(edited.submitted_at, submitted.submitted_at);
    assert_eq!(edited.filled_data["remarks"], json!("countersigned"));
}

#[tokio::test]
async fn test_approving_pending_submission_changes_nothing() {
    let fleet = TestFleet::new().await;
    let assigned = single_assignment(&fleet).await;

    let result = fleet
        .services
        .submissions
        .approve(&fleet.master, &assigned.id, None)
        .await;
    assert!(matches!(result, Err(FleetError::Validation { .. })));

    let unchanged = fleet
        .services
        .submissions
        .get(&fleet.master, &assigned.id)
        .await
        .unwrap();
    assert_eq!(unchanged.status, SubmissionStatus::Pending);
    assert!(unchanged.reviewed_by.is_none());
    assert_eq!(unchanged.updated_at, assigned.updated_at);
}

#[tokio::test]
async fn test_crew_cannot_touch_foreign_submission() {
    let fleet = TestFleet::new().await;
    let assigned = single_assignment(&fleet).await;
    let other_crew = &fleet.aurora_crew[1];

    assert!(matches!(
        fleet.services.submissions.get(other_crew, &assigned.id).await,
        Err(FleetError::Forbidden { .. })
    ));
    assert!(matches!(
        fleet
            .services
            .submissions
            .update(other_crew, &assigned.id, submit_with(json!({"checked": true})))
            .await,
        Err(FleetError::Forbidden { .. })
    ));
    assert!(matches!(
        fleet.services.submissions.get(&fleet.borealis_staff, &assigned.id).await,
        Err(FleetError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn test_crew_may_only_submit_and_nobody_may_flag() {
    let fleet = TestFleet::new().await;
    let assigned = single_assignment(&fleet).await;
    let assignee = &fleet.aurora_crew[0];

    let approve_self = SubmissionUpdate {
        status: Some(SubmissionStatus::Approved),
        ..Default::default()
    };
    assert!(matches!(
        fleet.services.submissions.update(assignee, &assigned.id, approve_self).await,
        Err(FleetError::Forbidden { .. })
    ));

    let flag = SubmissionUpdate {
        status: Some(SubmissionStatus::Flagged),
        ..Default::default()
    };
    assert!(matches!(
        fleet.services.submissions.update(&fleet.master, &assigned.id, flag).await,
        Err(FleetError::Validation { .. })
    ));

    // Draft save keeps the submission pending
    let draft = SubmissionUpdate {
        filled_data: Some(serde_json::from_value(json!({"remarks": "half done"})).unwrap()),
        ..Default::default()
    };
    let saved = fleet
        .services
        .submissions
        .update(assignee, &assigned.id, draft)
        .await
        .unwrap();
    assert_eq!(saved.status, SubmissionStatus::Pending);
    assert!(saved.submitted_at.is_none());
}

#[tokio::test]
async fn test_reject_requires_submitted_state() {
    let fleet = TestFleet::new().await;
    let assigned = single_assignment(&fleet).await;

    fleet
        .services
        .submissions
        .update(&fleet.aurora_crew[0], &assigned.id, submit_with(json!({"checked": false})))
        .await
        .unwrap();
    let rejected = fleet
        .services
        .submissions
        .reject(&fleet.master, &assigned.id, Some("Missing signature".to_owned()))
        .await
        .unwrap();
    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert!(rejected.reviewed_at.is_some());
}
