use super::*;
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn props(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("props must be an object, got {other}"),
    }
}

fn squaring_app() -> App {
    let mut app = App::new(
        "Squares",
        "<div>{{ input#name }}</div><div>{{ label#result }}</div>",
    )
    .expect("app");
    app.on("name", "input", |widgets| {
        let text = widgets.field("name", "value")?.as_str().unwrap_or_default().to_string();
        let squared = text
            .trim()
            .parse::<i64>()
            .map(|n| (n * n).to_string())
            .unwrap_or_else(|_| "Not a number!".to_string());
        widgets.set("result", "text", squared)
    })
    .expect("handler");
    app
}

#[test]
fn page_load_binds_default_markup() {
    let app = App::new("Demo", "<div>{{ input#name }}</div>").expect("app");
    assert_eq!(
        app.handle_page_load(),
        r#"<div><input type="text" id="name" class="widget"></div>"#
    );
}

#[test]
fn page_load_does_not_touch_widget_state() {
    let app = squaring_app();
    let first = app.handle_page_load();
    let second = app.handle_page_load();
    assert_eq!(first, second);
    assert!(app.widgets().pending().is_empty());
}

#[test]
fn input_event_runs_handler_and_reports_both_changes() {
    let mut app = squaring_app();
    let mutations = app
        .handle_event("name", "input", props(json!({ "value": "42" })))
        .expect("dispatch");

    assert_eq!(
        serde_json::to_string(&mutations).expect("json"),
        r#"[{"id_":"name","key":"value","value":"42"},{"id_":"result","key":"text","value":"1764"}]"#
    );
    assert_eq!(
        app.handle_page_load(),
        concat!(
            r#"<div><input type="text" id="name" class="widget" value="42"></div>"#,
            r#"<div><p id="result" class="widget">1764</p></div>"#
        )
    );
}

#[test]
fn unknown_widget_fails_and_queues_nothing() {
    let mut app = squaring_app();
    let err = app
        .handle_event("ghost", "input", props(json!({ "value": "1" })))
        .expect_err("ghost is not a widget");
    assert_eq!(err, RattleError::UnknownWidget { id: "ghost".into() });
    assert!(app.widgets().pending().is_empty());
}

#[test]
fn unknown_field_keeps_earlier_writes() {
    let mut app = App::new("Demo", "{{ label#result }}").expect("app");
    let err = app
        .handle_event(
            "result",
            "click",
            props(json!({ "text": "kept", "color": "red", "never": "reached" })),
        )
        .expect_err("label has no color");

    assert!(matches!(err, RattleError::UnknownField { ref field, .. } if field == "color"));
    assert_eq!(app.widgets().field("result", "text"), Ok(&Value::from("kept")));
    assert!(app.widgets().pending().is_empty());
}

#[test]
fn missing_handler_is_not_an_error() {
    let mut app = squaring_app();
    let mutations = app
        .handle_event("name", "click", props(json!({ "value": "3" })))
        .expect("dispatch");

    assert_eq!(
        mutations,
        vec![Mutation::new("name".into(), "value", Value::from("3"))]
    );
    assert_eq!(app.widgets().field("result", "text"), Ok(&Value::from("")));
}

#[test]
fn unchanged_values_produce_an_empty_list() {
    let mut app = squaring_app();
    app.handle_event("name", "click", props(json!({ "value": "5" })))
        .expect("first");
    let mutations = app
        .handle_event("name", "click", props(json!({ "value": "5" })))
        .expect("second");
    assert!(mutations.is_empty());
    assert_eq!(serde_json::to_string(&mutations).expect("json"), "[]");
}

#[test]
fn every_event_starts_from_an_empty_queue() {
    let mut app = squaring_app();
    app.handle_event("name", "input", props(json!({ "value": "2" })))
        .expect("first");
    let _ = app.handle_event("result", "click", props(json!({ "text": "x", "bad": 1 })));

    let mutations = app
        .handle_event("name", "input", props(json!({ "value": "3" })))
        .expect("third");
    let keys: Vec<(&str, &str)> = mutations
        .iter()
        .map(|m| (m.id.as_str(), m.key.as_str()))
        .collect();
    assert_eq!(keys, [("name", "value"), ("result", "text")]);
    assert_eq!(mutations[1].value, Value::from("9"));
}

#[test]
fn props_are_applied_in_the_order_given() {
    let mut app = App::new("Demo", "{{ button#go }}").expect("app");
    let mutations = app
        .handle_event(
            "go",
            "click",
            vec![("text", Value::from("a")), ("text", Value::from("b"))],
        )
        .expect("dispatch");
    let values: Vec<&Value> = mutations.iter().map(|m| &m.value).collect();
    assert_eq!(values, [&Value::from("a"), &Value::from("b")]);
}

#[test]
fn handler_errors_propagate_after_prop_writes() {
    let mut app = App::new("Demo", "{{ input#a }}").expect("app");
    app.on("a", "input", |widgets| widgets.set("missing", "text", "x"))
        .expect("handler");

    let err = app
        .handle_event("a", "input", props(json!({ "value": "1" })))
        .expect_err("handler writes to a missing widget");
    assert_eq!(err, RattleError::UnknownWidget { id: "missing".into() });
    assert_eq!(app.widgets().field("a", "value"), Ok(&Value::from("1")));
}

#[test]
fn handler_runs_once_per_event_and_only_for_its_event() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = App::new("Demo", "{{ button#go }}").expect("app");
    let counter = Arc::clone(&calls);
    app.on("go", "click", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .expect("handler");

    app.handle_event("go", "click", Map::new()).expect("click");
    app.handle_event("go", "input", Map::new()).expect("input");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(app.has_handler("go", "click"));
    assert!(!app.has_handler("go", "input"));
}

#[test]
fn registering_for_a_missing_widget_fails() {
    let mut app = App::new("Demo", "{{ input#a }}").expect("app");
    assert_eq!(
        app.on("ghost", "input", |_| Ok(())),
        Err(RattleError::UnknownWidget { id: "ghost".into() })
    );
}

#[test]
fn construction_rejects_bad_templates() {
    assert!(matches!(
        App::new("Demo", "{{ dial#x }}"),
        Err(RattleError::UnknownWidgetKind { .. })
    ));
    assert!(matches!(
        App::new("Demo", "{{ input#x }}{{ button#x }}"),
        Err(RattleError::DuplicateWidgetId { .. })
    ));
}

#[test]
fn handle_routes_both_request_shapes() {
    let mut app = squaring_app();
    let page = app.handle(AppRequest::PageLoad).expect("page");
    assert!(matches!(page, AppResponse::Page(ref html) if html.contains(r#"id="result""#)));

    let response = app
        .handle(AppRequest::Event {
            widget_id: "name".into(),
            event: "input".into(),
            props: props(json!({ "value": "abc" })),
        })
        .expect("event");
    assert_eq!(
        response,
        AppResponse::Mutations(vec![
            Mutation::new("name".into(), "value", Value::from("abc")),
            Mutation::new("result".into(), "text", Value::from("Not a number!")),
        ])
    );
}

#[test]
fn accessors_expose_construction_inputs() {
    let app = squaring_app();
    assert_eq!(app.title(), "Squares");
    assert!(app.template().contains("{{ label#result }}"));
    assert_eq!(app.widget("result").map(|w| w.render()), Some(r#"<p id="result" class="widget"></p>"#));
    assert!(app.widget("ghost").is_none());
}
