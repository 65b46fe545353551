mod common;

use common::{app_over, row, FakeBackend, ScriptedTransport, BASE};
use persona_core::{
    AlertLevel, ClickTarget, DeleteChain, DeleteResult, DeleteStrategy, Method, PersonaApp,
    RowCommand, TableView,
};

#[test]
fn fallback_reaches_method_override_in_order() {
    let backend =
        FakeBackend::new(&[DeleteStrategy::MethodOverride]).with_row(row(3, "Ana", "López"));
    let mut app = app_over(&backend);
    app.load_table().unwrap();

    app.request_delete(3, "Ana López");
    let result = app.confirm_delete();
    assert_eq!(
        result,
        DeleteResult::Deleted {
            id: 3,
            strategy: DeleteStrategy::MethodOverride,
            attempts: 3,
        }
    );

    let sent = backend.sent();
    assert_eq!(sent.len(), 5);
    assert_eq!(sent[1].method, Method::Delete);
    assert_eq!(sent[1].url, format!("{BASE}/3"));
    assert_eq!(sent[2].method, Method::Delete);
    assert_eq!(sent[2].url, BASE);
    assert_eq!(sent[2].body.as_ref().unwrap()["id_persona"], 3);
    assert_eq!(sent[3].method, Method::Post);
    assert_eq!(sent[3].header("X-HTTP-Method-Override"), Some("DELETE"));
    assert_eq!(sent[3].body.as_ref().unwrap()["id"], 3);
    assert_eq!(sent[4].method, Method::Get);

    assert_eq!(app.table(), &TableView::NoData);
    assert!(!app.busy().is_visible());
    let toast = app.toasts().last().unwrap();
    assert_eq!(toast.level, AlertLevel::Success);
    assert_eq!(toast.message, "Persona (ID: 3) borrada exitosamente.");
}

#[test]
fn first_accepted_form_stops_the_chain() {
    let backend = FakeBackend::new(&[DeleteStrategy::ByPath, DeleteStrategy::MethodOverride])
        .with_row(row(8, "Luis", "Pérez"));
    let mut app = app_over(&backend);
    app.load_table().unwrap();

    app.request_delete(8, "Luis Pérez");
    assert!(matches!(
        app.confirm_delete(),
        DeleteResult::Deleted {
            strategy: DeleteStrategy::ByPath,
            attempts: 1,
            ..
        }
    ));
    assert_eq!(backend.sent().len(), 3);
    assert!(backend.rows().is_empty());
}

#[test]
fn all_rejected_reports_last_message_without_mutation() {
    let transport = ScriptedTransport::new()
        .reply(404, r#"{"message":"ruta desconocida"}"#)
        .reply(405, r#"{"message":"método no permitido"}"#)
        .reply(409, r#"{"message":"tiene calificaciones"}"#);
    let mut app = app_over(&transport);

    app.request_delete(3, "Ana López");
    let result = app.confirm_delete();
    let raw = r#"{"message":"tiene calificaciones"}"#;
    let expected = format!(
        "Error al borrar: tiene calificaciones\n\nRespuesta del servidor:\n{raw}"
    );
    assert_eq!(result, DeleteResult::Failed(expected.clone()));

    assert_eq!(transport.sent().len(), 3);
    assert!(app.pending_delete().is_none());
    assert!(!app.busy().is_visible());
    let toast = app.toasts().last().unwrap();
    assert_eq!(toast.level, AlertLevel::Danger);
    assert_eq!(toast.message, expected);
}

#[test]
fn empty_rejection_body_falls_back_to_status() {
    let transport = ScriptedTransport::new()
        .reply(404, "")
        .reply(405, "")
        .reply(500, "");
    let mut app = app_over(&transport);

    app.request_delete(3, "Ana López");
    assert_eq!(
        app.confirm_delete(),
        DeleteResult::Failed("Error al borrar: Error HTTP: 500".to_string())
    );
}

#[test]
fn plain_text_rejection_is_used_as_reason() {
    let transport = ScriptedTransport::new()
        .reply(404, "")
        .reply(405, "")
        .reply(500, "Internal failure");
    let mut app = app_over(&transport);

    app.request_delete(3, "Ana López");
    assert_eq!(
        app.confirm_delete(),
        DeleteResult::Failed(
            "Error al borrar: Internal failure\n\nRespuesta del servidor:\nInternal failure"
                .to_string()
        )
    );
}

#[test]
fn transport_error_aborts_remaining_attempts() {
    let transport = ScriptedTransport::new()
        .reply(405, "nope")
        .fail("conexión rechazada")
        .reply(200, "");
    let mut app = app_over(&transport);

    app.request_delete(3, "Ana López");
    assert_eq!(
        app.confirm_delete(),
        DeleteResult::Failed(
            "Error al borrar: conexión rechazada\n\nRespuesta del servidor:\nnope".to_string()
        )
    );
    assert_eq!(transport.sent().len(), 2);
}

#[test]
fn path_only_mode_sends_a_single_request() {
    let transport = ScriptedTransport::new().reply(405, r#"{"message":"no"}"#);
    let mut config = common::test_config();
    config.delete_chain = DeleteChain::path_only();
    let mut app = PersonaApp::new(&transport, &config);

    app.request_delete(3, "Ana López");
    assert!(matches!(app.confirm_delete(), DeleteResult::Failed(_)));
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, format!("{BASE}/3"));
}

#[test]
fn row_delete_click_requests_confirmation_and_cancel_clears_it() {
    let backend = FakeBackend::new(&[DeleteStrategy::ByPath]).with_row(row(3, "Ana", "López"));
    let mut app = app_over(&backend);
    app.load_table().unwrap();

    let command = app.handle_row_click(0, ClickTarget::DeleteButton);
    assert_eq!(
        command,
        Some(RowCommand::Delete {
            id: 3,
            display_name: "Ana López".to_string(),
        })
    );
    assert!(!app.dialog().is_open());
    assert_eq!(
        app.pending_delete().unwrap().prompt(),
        "¿Estás seguro de que deseas borrar a Ana López (ID: 3)?"
    );

    assert!(app.cancel_delete().is_some());
    assert_eq!(app.confirm_delete(), DeleteResult::NothingPending);
    assert_eq!(backend.sent().len(), 1);
    assert_eq!(backend.rows().len(), 1);
}
