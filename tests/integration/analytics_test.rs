//! Activity Analytics Integration Tests
//!
//! Exercises the three aggregate endpoints against an in-memory store.

use plan_sentinel::{
    ActivityRecord, ActivityService, AggregationPeriod, Database, TimeWindow,
};

fn seeded_service() -> ActivityService {
    let db = Database::new_in_memory().unwrap();
    let service = ActivityService::from_pool(db.pool()).unwrap();

    let now = chrono::Utc::now().timestamp();
    let records = vec![
        ActivityRecord::new("alpha", "/alpha/.planning/roadmap.md", "add").with_timestamp(now - 10),
        ActivityRecord::new("alpha", "/alpha/.planning/roadmap.md", "change")
            .with_timestamp(now - 5),
        ActivityRecord::new("alpha", "/alpha/.todos/tasks.db", "change").with_timestamp(now),
        ActivityRecord::new("beta", "/beta/.planning/scope.md", "add")
            .with_timestamp(now - 3 * 86400),
        ActivityRecord::new("beta", "/beta/.planning/scope.md", "unlink")
            .with_timestamp(now - 2 * 86400),
    ];
    for record in &records {
        service.record_change(record).unwrap();
    }

    service
}

#[test]
fn summary_covers_all_kinds() {
    let service = seeded_service();

    let summary = service.activity_summary(&TimeWindow::default()).unwrap();
    assert_eq!(summary.total_events, 5);
    assert_eq!(summary.add_count, 2);
    assert_eq!(summary.change_count, 2);
    assert_eq!(summary.unlink_count, 1);
    assert_eq!(summary.distinct_projects, 2);
    assert_eq!(summary.distinct_files, 3);
}

#[test]
fn summary_with_window_excludes_old_events() {
    let service = seeded_service();

    let summary = service.activity_summary(&TimeWindow::last_days(1)).unwrap();
    assert_eq!(summary.total_events, 3);
    assert_eq!(summary.distinct_projects, 1);
}

#[test]
fn by_project_orders_busiest_first() {
    let service = seeded_service();

    let projects = service.activity_by_project(&TimeWindow::default()).unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].project_id, "alpha");
    assert_eq!(projects[0].total_events, 3);
    assert_eq!(projects[1].project_id, "beta");
    assert_eq!(projects[1].add_count, 1);
    assert_eq!(projects[1].unlink_count, 1);
    assert!(projects[0].last_event_at >= projects[1].last_event_at);
}

#[test]
fn by_project_respects_window() {
    let service = seeded_service();

    let projects = service
        .activity_by_project(&TimeWindow::last_days(1))
        .unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].project_id, "alpha");
}

#[test]
fn timeline_buckets_ascend() {
    let service = seeded_service();

    let points = service
        .activity_timeline(&TimeWindow::default(), AggregationPeriod::Daily)
        .unwrap();
    assert!(points.len() >= 2);

    for pair in points.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
    let total: i64 = points.iter().map(|p| p.event_count).sum();
    assert_eq!(total, 5);
}

#[test]
fn timeline_hourly_bucket_labels() {
    let service = seeded_service();

    let points = service
        .activity_timeline(&TimeWindow::last_days(1), AggregationPeriod::Hourly)
        .unwrap();
    for point in &points {
        assert!(point.timestamp_formatted.contains(":00:00"));
    }
}

#[test]
fn endpoints_serialize_to_json() {
    let service = seeded_service();
    let window = TimeWindow::default();

    let summary = service.activity_summary(&window).unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"total_events\":5"));

    let projects = service.activity_by_project(&window).unwrap();
    let json = serde_json::to_string(&projects).unwrap();
    assert!(json.contains("\"project_id\":\"alpha\""));

    let points = service
        .activity_timeline(&window, AggregationPeriod::Daily)
        .unwrap();
    let json = serde_json::to_string(&points).unwrap();
    assert!(json.contains("\"event_count\""));
}

#[test]
fn empty_window_yields_empty_aggregates() {
    let service = seeded_service();
    let window = TimeWindow::between(0, 1);

    let summary = service.activity_summary(&window).unwrap();
    assert_eq!(summary.total_events, 0);

    assert!(service.activity_by_project(&window).unwrap().is_empty());
    assert!(service
        .activity_timeline(&window, AggregationPeriod::Daily)
        .unwrap()
        .is_empty());
}
