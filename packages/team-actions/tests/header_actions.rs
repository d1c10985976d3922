//! End-to-end tests for the team profile header actions component.
//!
//! Each test wires the component to recording ports and drives it the way a
//! page would: render, click, observe the panel, notifier, router and bus.

use std::collections::HashMap;
use std::sync::Arc;

use team_actions::testing::{
    MockMembershipService, RecordingNavigator, RecordingNotifier, RecordingPanelView, RequestGate,
};
use team_actions::{
    ActionDeps, ActionOutcome, EligibilityState, HeaderActionsOptions, MeetingInfo,
    MembershipRecord, PanelContext, PanelPhase, ServiceError, Team, TeamActionsError, TeamEvent,
    TeamEventBus, TeamProfileHeaderActions, TeamState, Topic, UserInfo,
};

struct Harness {
    actions: Arc<TeamProfileHeaderActions>,
    service: Arc<MockMembershipService>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
    view: Arc<RecordingPanelView>,
    bus: TeamEventBus,
}

fn team(members: usize) -> Team {
    Team {
        id: "team-blue".into(),
        name: "Blue".into(),
        course_id: "course-v1:edX+DemoX".into(),
        topic_id: "topic-1".into(),
        membership: (0..members)
            .map(|i| MembershipRecord::new(format!("member{i}")))
            .collect(),
    }
}

fn context() -> PanelContext {
    PanelContext {
        user_info: UserInfo {
            username: "grace".into(),
            ..Default::default()
        },
        max_team_size: 5,
        course_id: "course-v1:edX+DemoX".into(),
        team_memberships_url: "/api/team/v0/team_membership/".into(),
        teams_url: "/api/team/v0/teams/".into(),
        ..Default::default()
    }
}

fn harness(service: MockMembershipService, context: PanelContext, team: Team) -> Harness {
    harness_with_topic(service, context, team, Topic::new("topic-1", Some("open")))
}

fn harness_with_topic(
    service: MockMembershipService,
    context: PanelContext,
    team: Team,
    topic: Topic,
) -> Harness {
    let service = Arc::new(service);
    let navigator = Arc::new(RecordingNavigator::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let view = Arc::new(RecordingPanelView::new());
    let bus = TeamEventBus::new();

    let actions = TeamProfileHeaderActions::new(HeaderActionsOptions {
        context,
        topic,
        team: TeamState::new(team),
        show_edit_button: true,
        deps: ActionDeps::new(
            service.clone(),
            navigator.clone(),
            notifier.clone(),
            view.clone(),
        ),
        bus: bus.clone(),
    })
    .expect("valid context");

    Harness {
        actions: Arc::new(actions),
        service,
        navigator,
        notifier,
        view,
        bus,
    }
}

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn test_empty_open_team_offers_join() {
    let h = harness(
        MockMembershipService::new().with_course_memberships(0),
        context(),
        team(0),
    );

    let state = h.actions.render().await;

    assert_eq!(state, Some(EligibilityState::ShowJoin));
    assert_eq!(
        h.service.count_calls(),
        vec![("grace".to_string(), "course-v1:edX+DemoX".to_string())]
    );
    let html = h.view.html().unwrap();
    assert!(html.contains("action-join-team"));
    assert!(!html.contains("join-team-message"));
    assert!(html.contains("action-edit-team"));
}

#[tokio::test]
async fn test_full_team_settles_without_lookup() {
    let h = harness(MockMembershipService::new(), context(), team(5));

    let state = h.actions.render().await;

    assert_eq!(state, Some(EligibilityState::TeamFull));
    assert!(h.service.count_calls().is_empty());
    let html = h.view.html().unwrap();
    assert!(html.contains("This team is full."));
    assert!(!html.contains("action-join-team"));
}

#[tokio::test]
async fn test_member_of_team_sees_no_join_action() {
    let mut members = team(1);
    members.membership.push(MembershipRecord::new("grace"));
    let h = harness(MockMembershipService::new(), context(), members);

    let state = h.actions.render().await;

    assert_eq!(state, Some(EligibilityState::NoAction));
    assert!(h.service.calls().is_empty());
    let html = h.view.html().unwrap();
    assert!(!html.contains("action-join-team"));
    assert!(!html.contains("join-team-message"));
}

#[tokio::test]
async fn test_member_elsewhere_sees_message() {
    let h = harness(
        MockMembershipService::new().with_course_memberships(1),
        context(),
        team(2),
    );

    assert_eq!(
        h.actions.render().await,
        Some(EligibilityState::AlreadyMemberElsewhere)
    );
    assert!(h
        .view
        .html()
        .unwrap()
        .contains("You already belong to another team."));
}

#[tokio::test]
async fn test_instructor_managed_topic_blocks_learners_only() {
    let learner = harness_with_topic(
        MockMembershipService::new(),
        context(),
        team(0),
        Topic::new("topic-1", Some("public_managed")),
    );
    learner.actions.render().await;
    let html = learner.view.html().unwrap();
    assert!(html.contains("Cannot join instructor managed team"));
    assert!(!html.contains("action-join-team"));

    let mut staff_context = context();
    staff_context.user_info.staff = true;
    let staff = harness_with_topic(
        MockMembershipService::new(),
        staff_context,
        team(0),
        Topic::new("topic-1", Some("public_managed")),
    );
    assert_eq!(staff.actions.render().await, Some(EligibilityState::ShowJoin));
}

#[tokio::test]
async fn test_render_is_idempotent() {
    let h = harness(MockMembershipService::new(), context(), team(3));

    h.actions.render().await;
    h.actions.render().await;

    let renders = h.view.renders();
    assert_eq!(renders.len(), 2);
    assert_eq!(renders[0], renders[1]);
    assert_eq!(
        renders[0].matches("action-join-team").count(),
        1,
        "join control must not be duplicated"
    );
}

#[tokio::test]
async fn test_lookup_failure_is_reported_and_join_hidden() {
    let h = harness(
        MockMembershipService::new()
            .with_count_error(ServiceError::api("membership lookup", 503, "unavailable")),
        context(),
        team(0),
    );

    assert_eq!(h.actions.render().await, Some(EligibilityState::Unresolved));
    assert!(!h.view.html().unwrap().contains("action-join-team"));
    assert_eq!(
        h.notifier.errors(),
        vec!["An error occurred. Try again.".to_string()]
    );
}

#[tokio::test]
async fn test_meeting_button_rendered_when_enabled() {
    let mut ctx = context();
    ctx.show_live_collaboration = true;
    ctx.create_meetings_url = Some("/api/meetings/".into());
    ctx.meeting_portal_url = Some("https://meet.example.org".into());
    ctx.meetings = HashMap::from([(
        "team-blue".to_string(),
        MeetingInfo {
            meeting_id: Some("m-42".into()),
            name: Some("Standup".into()),
            ..Default::default()
        },
    )]);
    let h = harness(MockMembershipService::new(), ctx, team(1));

    h.actions.render().await;

    let html = h.view.html().unwrap();
    assert!(html.contains("action-join-meeting"));
    assert!(html.contains(r#"data-meeting-id="m-42""#));
    assert!(html.contains("Join Meeting: Standup"));
}

#[tokio::test]
async fn test_invalid_context_rejected() {
    let mut ctx = context();
    ctx.team_memberships_url = String::new();

    let result = TeamProfileHeaderActions::new(HeaderActionsOptions {
        context: ctx,
        topic: Topic::new("topic-1", None),
        team: TeamState::new(team(0)),
        show_edit_button: false,
        deps: ActionDeps::new(
            Arc::new(MockMembershipService::new()),
            Arc::new(RecordingNavigator::new()),
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingPanelView::new()),
        ),
        bus: TeamEventBus::new(),
    });

    match result {
        Err(TeamActionsError::Configuration(message)) => {
            assert!(message.contains("teamMembershipsUrl"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid context was accepted"),
    }
}

// =============================================================================
// Join
// =============================================================================

#[tokio::test]
async fn test_join_failure_surfaces_payload_and_emits_nothing() {
    let h = harness(
        MockMembershipService::new().with_create_error(ServiceError::api(
            "join team",
            400,
            r#"{"user_message": "You are already in a team in this course."}"#,
        )),
        context(),
        team(0),
    );
    let mut events = h.bus.subscribe();
    let before = h.actions.team().current();

    let outcome = h.actions.join_team().await;

    assert_eq!(outcome, ActionOutcome::Failed);
    assert_eq!(
        h.notifier.errors(),
        vec!["You are already in a team in this course.".to_string()]
    );
    assert!(h.service.fetch_calls().is_empty());
    assert_eq!(h.actions.team().current(), before);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_join_failure_without_payload_shows_generic_message() {
    let h = harness(
        MockMembershipService::new()
            .with_create_error(ServiceError::api("join team", 500, "Internal Server Error")),
        context(),
        team(0),
    );

    assert_eq!(h.actions.join_team().await, ActionOutcome::Failed);
    assert_eq!(
        h.notifier.errors(),
        vec!["An error occurred. Try again.".to_string()]
    );
}

#[tokio::test]
async fn test_join_success_emits_single_update_after_refresh() {
    let mut joined = team(0);
    joined.membership.push(MembershipRecord::new("grace"));
    let h = harness(
        MockMembershipService::new().with_team(joined.clone()),
        context(),
        team(0),
    );
    let mut events = h.bus.subscribe();

    let outcome = h.actions.join_team().await;

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(
        h.service.create_calls(),
        vec![("team-blue".to_string(), "grace".to_string())]
    );
    assert_eq!(h.service.fetch_calls(), vec!["team-blue".to_string()]);
    assert_eq!(h.actions.team().current(), joined);

    let event = events.try_recv().expect("join event");
    assert_eq!(event.channel(), "teams:update");
    assert_eq!(event.action(), "join");
    assert_eq!(event.team(), &joined);
    assert!(matches!(event, TeamEvent::Joined { ref team_id, .. } if team_id == "team-blue"));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_join_rerenders_panel_once_running() {
    let mut joined = team(0);
    joined.membership.push(MembershipRecord::new("grace"));
    let h = harness(
        MockMembershipService::new().with_team(joined),
        context(),
        team(0),
    );
    h.actions.start();
    h.view.wait_for_renders(1).await;
    assert!(h.view.html().unwrap().contains("action-join-team"));

    let mut phase = h.actions.subscribe_phase();
    assert_eq!(h.actions.join_team().await, ActionOutcome::Completed);
    phase
        .wait_for(|p| *p == PanelPhase::Rendered(EligibilityState::NoAction))
        .await
        .unwrap();

    assert_eq!(h.view.render_count(), 2);
    assert!(!h.view.html().unwrap().contains("action-join-team"));
    h.actions.shutdown().await;
}

#[tokio::test]
async fn test_double_click_issues_one_join() {
    let gate = RequestGate::new();
    let h = harness(
        MockMembershipService::new()
            .with_team(team(1))
            .with_create_gate(gate.clone()),
        context(),
        team(0),
    );

    let first = tokio::spawn({
        let actions = h.actions.clone();
        async move { actions.join_team().await }
    });
    while h.service.create_calls().is_empty() {
        tokio::task::yield_now().await;
    }

    assert_eq!(h.actions.join_team().await, ActionOutcome::Ignored);

    gate.release(1);
    assert_eq!(first.await.unwrap(), ActionOutcome::Completed);
    assert_eq!(h.service.create_calls().len(), 1);
}

#[tokio::test]
async fn test_teardown_discards_pending_join() {
    let gate = RequestGate::new();
    let h = harness(
        MockMembershipService::new()
            .with_team(team(1))
            .with_create_gate(gate.clone()),
        context(),
        team(0),
    );
    let mut events = h.bus.subscribe();

    let pending = tokio::spawn({
        let actions = h.actions.clone();
        async move { actions.join_team().await }
    });
    while h.service.create_calls().is_empty() {
        tokio::task::yield_now().await;
    }

    h.actions.teardown();
    gate.release(1);

    assert_eq!(pending.await.unwrap(), ActionOutcome::Discarded);
    assert!(h.notifier.errors().is_empty());
    assert!(events.try_recv().is_err());
    assert!(h.actions.is_torn_down());
}

// =============================================================================
// Edit and meeting
// =============================================================================

#[tokio::test]
async fn test_edit_routes_to_edit_page() {
    let h = harness(MockMembershipService::new(), context(), team(2));

    assert_eq!(h.actions.edit_team(), ActionOutcome::Completed);

    assert_eq!(
        h.navigator.routes(),
        vec!["teams/topic-1/team-blue/edit-team".to_string()]
    );
    assert!(h.service.calls().is_empty());
}

#[tokio::test]
async fn test_join_meeting_redirects_after_creation() {
    let mut ctx = context();
    ctx.show_live_collaboration = true;
    ctx.create_meetings_url = Some("/api/meetings/".into());
    ctx.meeting_portal_url = Some("https://meet.example.org/".into());
    let h = harness(
        MockMembershipService::new().with_meeting_id("abc123"),
        ctx,
        team(2),
    );

    assert_eq!(h.actions.join_meeting().await, ActionOutcome::Completed);

    assert_eq!(h.service.meeting_calls(), 1);
    assert_eq!(
        h.navigator.redirects(),
        vec!["https://meet.example.org/meeting/abc123".to_string()]
    );
}

#[tokio::test]
async fn test_join_meeting_failure_does_not_redirect() {
    let mut ctx = context();
    ctx.show_live_collaboration = true;
    ctx.create_meetings_url = Some("/api/meetings/".into());
    ctx.meeting_portal_url = Some("https://meet.example.org".into());
    let h = harness(
        MockMembershipService::new()
            .with_meeting_error(ServiceError::new("create meeting", "connection reset")),
        ctx,
        team(2),
    );

    assert_eq!(h.actions.join_meeting().await, ActionOutcome::Failed);
    assert!(h.navigator.redirects().is_empty());
    assert_eq!(
        h.notifier.errors(),
        vec!["An error occurred. Try again.".to_string()]
    );
}
