// ABOUTME: Test UI display of the keychain screen, call panels, toasts and help overlay

mod common;

use common::{guardians, test_config, FakeCamera, FakeLocation, ScriptedClassifier};
use guardian_keychain::app::{App, AppEvent, EventHandler};
use guardian_keychain::classifier::ClassifierClient;
use guardian_keychain::components::LayoutComponent;
use guardian_keychain::guardians::GuardianRegistry;
use guardian_keychain::session::CallStatus;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use std::time::Duration;

fn create_app(guardian_count: usize, camera: FakeCamera) -> App {
    App::new(
        test_config(),
        GuardianRegistry::in_memory(guardians(guardian_count)),
        Arc::new(camera),
        Arc::new(FakeLocation::new()),
        ClassifierClient::new(Arc::new(ScriptedClassifier::new())),
    )
}

fn render(app: &App) -> String {
    let backend = TestBackend::new(160, 48);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut layout = LayoutComponent::new();

    terminal
        .draw(|frame| {
            layout.render(frame, &app.state);
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_idle_screen_shows_sos_and_guardian_count() {
    let app = create_app(2, FakeCamera::granted());
    let content = render(&app);

    assert!(content.contains("In Case of Emergency"));
    assert!(content.contains("Press the button to call for help"));
    assert!(content.contains("SOS"));
    assert!(content.contains("2 guardians will be alerted"));
    assert!(!content.contains("Add guardians"));

    assert!(content.contains("[s]OS"), "Idle menu bar should offer SOS");
    assert!(content.contains("[?]help"));
    assert!(content.contains("[q]uit"));
    assert!(!content.contains("[e]nd call"));
}

#[tokio::test(start_paused = true)]
async fn test_idle_screen_without_guardians_explains_disabled_button() {
    let mut app = create_app(0, FakeCamera::granted());

    EventHandler::process_event(AppEvent::StartCall, &mut app.state);
    app.tick();

    assert_eq!(app.session().status(), CallStatus::Idle);
    let content = render(&app);
    assert!(content.contains("0 guardians will be alerted"));
    assert!(content.contains("Add guardians to enable the SOS button"));
    assert!(content.contains("No guardians configured"));
}

#[tokio::test(start_paused = true)]
async fn test_background_reload_clears_no_guardian_advisory() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("guardians.json");
    std::fs::write(&path, "[]").unwrap();

    let mut app = App::new(
        test_config(),
        GuardianRegistry::open(&path).unwrap(),
        Arc::new(FakeCamera::granted()),
        Arc::new(FakeLocation::new()),
        ClassifierClient::new(Arc::new(ScriptedClassifier::new())),
    );

    EventHandler::process_event(AppEvent::StartCall, &mut app.state);
    app.tick();
    assert!(app.state.status_message.is_some());

    std::fs::write(&path, r#"[{"name":"Ana","phone":"555-0100"}]"#).unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;
    app.tick();

    assert!(app.state.view.can_start);
    assert!(app.state.status_message.is_none());
    let content = render(&app);
    assert!(content.contains("1 guardians will be alerted"));
    assert!(!content.contains("No guardians configured"));
}

#[tokio::test(start_paused = true)]
async fn test_call_screen_after_activation() {
    let mut app = create_app(2, FakeCamera::granted());

    EventHandler::process_event(AppEvent::StartCall, &mut app.state);
    app.tick();
    assert!(app.state.view.is_loading);
    assert!(render(&app).contains("Connecting..."));

    tokio::time::sleep(Duration::from_secs(2)).await;
    app.tick();
    assert!(app.state.view.is_calling);
    assert!(app.needs_ui_refresh());

    let content = render(&app);
    assert!(content.contains("LIVE 360"), "Camera panel should show the live feed");
    assert!(content.contains("Location Shared"));
    assert!(content.contains("Getting coordinates..."));
    assert!(content.contains("AI Safety Analysis"));
    assert!(content.contains("Analyzing surroundings..."));
    assert!(content.contains("Guardian Alert Sent"), "Toast should announce the alert");
    assert!(content.contains("[e]nd call"));

    // First verdict lands on the next tick
    tokio::time::sleep(Duration::from_millis(10)).await;
    app.tick();
    assert!(render(&app).contains("No immediate threats detected."));
}

#[tokio::test(start_paused = true)]
async fn test_call_screen_with_camera_denied() {
    let mut app = create_app(1, FakeCamera::denied());

    EventHandler::process_event(AppEvent::StartCall, &mut app.state);
    app.tick();
    tokio::time::sleep(Duration::from_secs(2)).await;
    app.tick();

    let content = render(&app);
    assert!(content.contains("Camera access denied"));
    assert!(content.contains("Camera Access Denied"), "Toast should report the denial");
    assert!(!content.contains("LIVE 360"));
}

#[tokio::test(start_paused = true)]
async fn test_end_call_returns_to_idle_screen() {
    let mut app = create_app(2, FakeCamera::granted());

    EventHandler::process_event(AppEvent::StartCall, &mut app.state);
    app.tick();
    tokio::time::sleep(Duration::from_secs(2)).await;
    app.tick();

    EventHandler::process_event(AppEvent::EndCall, &mut app.state);
    app.tick();

    assert_eq!(app.session().status(), CallStatus::Idle);
    assert!(app.session().resources().is_released());
    let content = render(&app);
    assert!(content.contains("In Case of Emergency"));
    assert!(content.contains("Call Ended"));
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_clears_toasts() {
    let mut app = create_app(2, FakeCamera::granted());

    EventHandler::process_event(AppEvent::StartCall, &mut app.state);
    app.tick();
    tokio::time::sleep(Duration::from_secs(2)).await;
    app.tick();
    assert!(!app.state.toasts.is_empty());

    EventHandler::process_event(AppEvent::DismissToasts, &mut app.state);
    assert!(app.state.toasts.is_empty());
    assert!(!render(&app).contains("Guardian Alert Sent"));
}

#[tokio::test(start_paused = true)]
async fn test_help_screen_lists_call_keys() {
    let mut app = create_app(2, FakeCamera::granted());
    app.state.help_visible = true;

    let content = render(&app);
    assert!(content.contains("Emergency Call:"));
    assert!(content.contains("Enter/s    Press SOS and start a call"));
    assert!(content.contains("e          End the call"));
    assert!(content.contains("Guardians:"));
    assert!(content.contains("General:"));
}
