// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use console_app::{
    Config, Console, Locator, NotificationId, Outcome, PanelCommand, PanelProjection, PanelState,
    Router, Severity, Trigger,
};
use console_testkit::FakePage;
use std::time::Duration;

fn search(page: &mut FakePage, console: &mut Console, query: &str) -> Result<Outcome> {
    Router::standard().dispatch(
        console,
        page,
        &Trigger::SearchChanged {
            input: Locator::from("courseSearch"),
            query: query.to_owned(),
        },
    )
}

fn panel(page: &mut FakePage, console: &mut Console, command: PanelCommand) -> Result<Outcome> {
    Router::standard().dispatch(console, page, &Trigger::Panel(command))
}

#[test]
fn search_hides_rows_without_a_match_in_name_or_trainer() -> Result<()> {
    let mut page = FakePage::course_page();
    let mut console = Console::new(Config::default())?;

    search(&mut page, &mut console, "ALICE")?;
    assert!(!page.row_hidden("courseTable", 0));
    assert!(page.row_hidden("courseTable", 1));
    assert!(!page.row_hidden("courseTable", 2));
    assert!(page.row_hidden("courseTable", 3));
    Ok(())
}

#[test]
fn each_search_writes_the_table_once() -> Result<()> {
    let mut page = FakePage::course_page();
    let mut console = Console::new(Config::default())?;

    search(&mut page, &mut console, "yo")?;
    assert_eq!(page.table_writes, 1);
    search(&mut page, &mut console, "")?;
    assert_eq!(page.table_writes, 2);
    Ok(())
}

#[test]
fn clearing_the_query_shows_every_row_again() -> Result<()> {
    let mut page = FakePage::course_page();
    let mut console = Console::new(Config::default())?;

    search(&mut page, &mut console, "no such course")?;
    assert!((1..=3).all(|row| page.row_hidden("courseTable", row)));

    search(&mut page, &mut console, "")?;
    assert!((0..=3).all(|row| !page.row_hidden("courseTable", row)));
    Ok(())
}

#[test]
fn search_on_an_unconfigured_input_is_ignored() -> Result<()> {
    let mut page = FakePage::course_page();
    let mut console = Console::new(Config::default())?;

    let outcome = Router::standard().dispatch(
        &mut console,
        &mut page,
        &Trigger::SearchChanged {
            input: Locator::from("csrSearch"),
            query: "x".to_owned(),
        },
    )?;
    assert_eq!(outcome, Outcome::Ignored);
    assert!(page.hidden_rows.is_empty());
    Ok(())
}

#[test]
fn escape_only_acts_while_the_panel_is_open() -> Result<()> {
    let mut page = FakePage::new();
    let mut console = Console::new(Config::default())?;

    assert_eq!(
        panel(&mut page, &mut console, PanelCommand::Escape)?,
        Outcome::Ignored
    );
    assert_eq!(page.projections, 0);

    panel(&mut page, &mut console, PanelCommand::Toggle)?;
    assert_eq!(console.panel.state, PanelState::Expanded);
    assert_eq!(
        page.panel,
        Some(PanelProjection {
            panel_shown: true,
            content_expanded: true,
            backdrop_shown: true,
        })
    );

    panel(&mut page, &mut console, PanelCommand::Escape)?;
    assert_eq!(console.panel.state, PanelState::Collapsed);
    let projection = page.panel.expect("projection applied");
    assert!(!projection.backdrop_shown);
    assert!(!projection.panel_shown);
    assert!(!projection.content_expanded);
    assert_eq!(page.projections, 2);
    Ok(())
}

#[test]
fn configured_collapse_width_drives_resize() -> Result<()> {
    let config = Config::parse("version = 1\n[panel]\ncollapse_width = 600\n")?;
    let mut console = Console::new(config)?;
    let mut page = FakePage::new();

    panel(&mut page, &mut console, PanelCommand::Open)?;
    panel(&mut page, &mut console, PanelCommand::Resize { width: 800 })?;
    assert_eq!(console.panel.state, PanelState::Expanded);

    panel(&mut page, &mut console, PanelCommand::Resize { width: 600 })?;
    assert_eq!(console.panel.state, PanelState::Collapsed);
    Ok(())
}

#[test]
fn notification_expires_on_the_virtual_clock() -> Result<()> {
    let mut page = FakePage::new();
    let mut console = Console::new(Config::default())?;
    let router = Router::standard();

    let id = console.notify(&mut page, "Course saved", Severity::Success);
    assert_eq!(
        page.alerts[0].node.class_name(),
        "modern-alert alert-success"
    );
    assert_eq!(page.alerts[0].node.icon(), "check-circle");

    router.dispatch(
        &mut console,
        &mut page,
        &Trigger::TimerFired {
            now: Duration::from_millis(10),
        },
    )?;
    assert!(page.alert(id).is_some_and(|alert| alert.revealed));

    router.dispatch(
        &mut console,
        &mut page,
        &Trigger::TimerFired {
            now: Duration::from_millis(5000),
        },
    )?;
    assert!(page.alert(id).is_some_and(|alert| alert.fading));

    router.dispatch(
        &mut console,
        &mut page,
        &Trigger::TimerFired {
            now: Duration::from_millis(5300),
        },
    )?;
    assert!(page.alert(id).is_none());
    assert_eq!(console.notifier.next_deadline(), None);
    Ok(())
}

#[test]
fn manual_dismiss_then_timer_detaches_once() -> Result<()> {
    let mut page = FakePage::new();
    let mut console = Console::new(Config::default())?;
    let router = Router::standard();

    let id = console.notify(&mut page, "Heads up", Severity::Info);
    router.dispatch(&mut console, &mut page, &Trigger::AlertDismissed(id))?;
    assert!(page.alerts.is_empty());

    router.dispatch(
        &mut console,
        &mut page,
        &Trigger::TimerFired {
            now: Duration::from_secs(30),
        },
    )?;
    assert_eq!(page.alert_detaches, 1);
    Ok(())
}

#[test]
fn second_notification_replaces_the_first() -> Result<()> {
    let mut page = FakePage::new();
    let mut console = Console::new(Config::default())?;

    console.notify(&mut page, "first", Severity::Error);
    let second = console.notify(&mut page, "second", Severity::Error);
    assert_eq!(page.alerts.len(), 1);
    assert_eq!(page.alerts[0].node.id, second);
    assert_eq!(page.alert_inserts, 2);
    Ok(())
}

#[test]
fn server_rendered_alerts_are_adopted_and_expire() -> Result<()> {
    let mut page = FakePage::new().with_server_alert(NotificationId::new(1), "Welcome back");
    let mut console = Console::new(Config::default())?;
    let router = Router::standard();

    let outcome = router.dispatch(
        &mut console,
        &mut page,
        &Trigger::PageLoaded { server_alerts: 1 },
    )?;
    assert_eq!(outcome, Outcome::Adopted(vec![NotificationId::new(1)]));

    router.dispatch(
        &mut console,
        &mut page,
        &Trigger::TimerFired {
            now: Duration::from_millis(5300),
        },
    )?;
    assert!(page.alerts.is_empty());
    Ok(())
}

#[test]
fn page_without_anchor_or_body_drops_the_notification_quietly() -> Result<()> {
    let mut page = FakePage::new().without_alert_anchor().without_page_body();
    let mut console = Console::new(Config::default())?;

    console.notify(&mut page, "nowhere to go", Severity::Error);
    assert!(page.alerts.is_empty());
    assert_eq!(console.notifier.next_deadline(), None);
    Ok(())
}

#[test]
fn csr_mismatch_without_form_header_shows_at_page_top() -> Result<()> {
    let mut page = FakePage::csr_page()
        .without_alert_anchor()
        .with_field("password", "secret99")
        .with_field("confirmPassword", "secret98");
    let mut console = Console::new(Config::default())?;

    let outcome = Router::standard().dispatch(
        &mut console,
        &mut page,
        &Trigger::FormSubmitted {
            form: Locator::from("addCSRForm"),
        },
    )?;
    assert_eq!(outcome, Outcome::Blocked);
    assert_eq!(page.alerts.len(), 1);
    assert!(page.alerts[0].at_page_top);
    assert_eq!(page.alerts[0].node.message, "Passwords do not match!");
    assert_eq!(
        console.notifier.next_deadline(),
        Some(Duration::from_millis(10))
    );
    Ok(())
}

#[test]
fn configured_anchor_is_used_when_present() -> Result<()> {
    let config = Config::parse("version = 1\n[notifications]\nanchor = \".page-title\"\n")?;
    let mut page = FakePage::new();
    let mut console = Console::new(config)?;

    console.notify(&mut page, "saved", Severity::Success);
    assert_eq!(console.notifier.anchor().as_str(), ".page-title");
    assert_eq!(page.alerts.len(), 1);
    assert!(!page.alerts[0].at_page_top);
    Ok(())
}
