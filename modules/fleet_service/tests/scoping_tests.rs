//! Ship scoping and role checks across services

mod common;

use common::{print_test_header, TestFleet};
use fleet_service::contract::{FleetError, NewTask, Task, TaskStatus, TaskUpdate};
use fleet_service::domain::service::{SubmissionFilter, TaskFilter};
use fleet_service::contract::{AssigneeSelector, FormCategory, TemplateSelector, WorkOrder};
use serde_json::json;

async fn create_task(fleet: &TestFleet, ship_id: &str, equipment: &str, assigned_to: Option<&str>) -> Task {
    let new_task: NewTask = serde_json::from_value(json!({
        "ship_id": ship_id,
        "equipment_name": equipment,
        "task_description": format!("Inspect {equipment}"),
        "frequency": "weekly",
        "assigned_to": assigned_to,
    }))
    .unwrap();
    fleet.services.tasks.create(&fleet.master, new_task).await.unwrap()
}

#[tokio::test]
async fn test_unassigned_staff_and_crew_see_nothing() {
    print_test_header(
        "test_unassigned_staff_and_crew_see_nothing",
        &["Users without a ship get empty lists, even when they ask for a ship"],
    );
    let fleet = TestFleet::new().await;
    create_task(&fleet, &fleet.aurora.id, "Main engine", None).await;
    create_task(&fleet, &fleet.borealis.id, "Windlass", None).await;

    for caller in [&fleet.shoreside_staff, &fleet.shoreside_crew] {
        let tasks = fleet
            .services
            .tasks
            .list(
                caller,
                TaskFilter {
                    ship_id: Some(fleet.aurora.id.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(tasks.is_empty(), "{} should see no tasks", caller.name);
    }
}

#[tokio::test]
async fn test_staff_filter_for_other_ship_is_overridden() {
    print_test_header(
        "test_staff_filter_for_other_ship_is_overridden",
        &["STAFF on Aurora asking for Borealis still gets Aurora's tasks"],
    );
    let fleet = TestFleet::new().await;
    create_task(&fleet, &fleet.aurora.id, "Main engine", None).await;
    create_task(&fleet, &fleet.aurora.id, "Generator", None).await;
    create_task(&fleet, &fleet.borealis.id, "Windlass", None).await;

    let tasks = fleet
        .services
        .tasks
        .list(
            &fleet.aurora_staff,
            TaskFilter {
                ship_id: Some(fleet.borealis.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.ship_id == fleet.aurora.id));
    assert!(tasks.iter().all(|t| t.ship_name.as_deref() == Some("MV Aurora")));

    let all = fleet
        .services
        .tasks
        .list(&fleet.master, TaskFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_crew_sees_only_assigned_tasks() {
    let fleet = TestFleet::new().await;
    let deckhand = &fleet.aurora_crew[0];
    let mine = create_task(&fleet, &fleet.aurora.id, "Mooring lines", Some(&deckhand.user_id)).await;
    let other = create_task(&fleet, &fleet.aurora.id, "Galley", Some(&fleet.aurora_crew[2].user_id)).await;

    let tasks = fleet
        .services
        .tasks
        .list(deckhand, TaskFilter::default())
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, mine.id);
    assert_eq!(tasks[0].assigned_to_name.as_deref(), Some("Aurora Deckhand"));

    assert!(matches!(
        fleet.services.tasks.get(deckhand, &other.id).await,
        Err(FleetError::Forbidden { .. })
    ));
}

#[tokio::test]
async fn test_crew_cannot_approve_or_reject_own_task() {
    print_test_header(
        "test_crew_cannot_approve_or_reject_own_task",
        &[
            "A crew assignee may only move a task between working states",
            "Approval and rejection stay with the MASTER endpoints",
        ],
    );
    let fleet = TestFleet::new().await;
    let deckhand = &fleet.aurora_crew[0];
    let task = create_task(&fleet, &fleet.aurora.id, "Mooring lines", Some(&deckhand.user_id)).await;

    for status in [TaskStatus::Approved, TaskStatus::Rejected, TaskStatus::Overdue] {
        let update = TaskUpdate {
            status: Some(status),
            ..Default::default()
        };
        assert!(
            matches!(
                fleet.services.tasks.update(deckhand, &task.id, update).await,
                Err(FleetError::Forbidden { .. })
            ),
            "crew set {status:?}"
        );
    }
    let unchanged = fleet.services.tasks.get(&fleet.master, &task.id).await.unwrap();
    assert_eq!(unchanged.status, TaskStatus::Pending);
    assert_eq!(unchanged.approved_by, None);

    let completed = fleet
        .services
        .tasks
        .update(
            deckhand,
            &task.id,
            TaskUpdate {
                status: Some(TaskStatus::Completed),
                completion_notes: Some("Lines replaced".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_point_access_to_other_ship_is_forbidden() {
    let fleet = TestFleet::new().await;
    let task = create_task(&fleet, &fleet.borealis.id, "Windlass", None).await;

    assert!(fleet.services.tasks.get(&fleet.borealis_staff, &task.id).await.is_ok());
    assert!(matches!(
        fleet.services.tasks.get(&fleet.aurora_staff, &task.id).await,
        Err(FleetError::Forbidden { .. })
    ));
    assert!(matches!(
        fleet.services.tasks.ship_stats(&fleet.aurora_staff, &fleet.borealis.id).await,
        Err(FleetError::Forbidden { .. })
    ));
    assert!(matches!(
        fleet.services.tasks.get(&fleet.master, "missing").await,
        Err(FleetError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_master_only_operations_reject_staff_and_crew() {
    let fleet = TestFleet::new().await;

    let ship = common::new_ship("MV Cassiopeia", "9000003");
    assert!(matches!(
        fleet.services.ships.create(&fleet.aurora_staff, ship.clone()).await,
        Err(FleetError::Forbidden { .. })
    ));
    assert!(matches!(
        fleet.services.ships.create(&fleet.aurora_crew[0], ship.clone()).await,
        Err(FleetError::Forbidden { .. })
    ));
    assert!(fleet.services.ships.create(&fleet.master, ship).await.is_ok());

    let ships = fleet.services.ships.list(&fleet.aurora_crew[0]).await.unwrap();
    assert_eq!(ships.len(), 1);
    assert_eq!(ships[0].id, fleet.aurora.id);
    assert_eq!(ships[0].crew_count, 4);
}

#[tokio::test]
async fn test_submissions_list_is_scoped_by_vessel_and_assignee() {
    let fleet = TestFleet::new().await;
    let template = fleet.template("Daily deck round", FormCategory::Checklist).await;

    for vessel in [&fleet.aurora, &fleet.borealis] {
        fleet
            .services
            .fanout
            .trigger_work(
                &fleet.master,
                WorkOrder {
                    vessel_id: vessel.id.clone(),
                    templates: TemplateSelector::Ids(vec![template.id.clone()]),
                    assignees: AssigneeSelector::AllCrewOnVessel,
                    due_date: None,
                },
            )
            .await
            .unwrap();
    }
    fleet
        .services
        .fanout
        .trigger_work(
            &fleet.master,
            WorkOrder {
                vessel_id: fleet.aurora.id.clone(),
                templates: TemplateSelector::Ids(vec![template.id.clone()]),
                assignees: AssigneeSelector::Unassigned,
                due_date: None,
            },
        )
        .await
        .unwrap();

    let staff_view = fleet
        .services
        .submissions
        .list(
            &fleet.aurora_staff,
            SubmissionFilter {
                vessel_id: Some(fleet.borealis.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(staff_view.len(), 4);
    assert!(staff_view.iter().all(|s| s.vessel_id == fleet.aurora.id));

    // own assignment plus the vessel-wide copy
    let crew_view = fleet
        .services
        .submissions
        .list(&fleet.aurora_crew[1], SubmissionFilter::default())
        .await
        .unwrap();
    assert_eq!(crew_view.len(), 2);
    assert!(crew_view.iter().all(|s| {
        s.assigned_to.is_none() || s.assigned_to.as_deref() == Some(fleet.aurora_crew[1].user_id.as_str())
    }));

    let everything = fleet
        .services
        .submissions
        .list(&fleet.master, SubmissionFilter::default())
        .await
        .unwrap();
    assert_eq!(everything.len(), 5);
}
