use super::*;

#[test]
fn binds_a_single_input() {
    let source = "<div>{{ input#name }}</div>";
    let widgets = parse(source).expect("parse");
    assert_eq!(
        bind(source, &widgets),
        r#"<div><input type="text" id="name" class="widget"></div>"#
    );
}

#[test]
fn widgets_follow_first_appearance() {
    let source = "{{ label#b }} {{ input#a }} {{ label#b }} {{ button#c }}";
    let widgets = parse(source).expect("parse");
    let ids: Vec<&str> = widgets.iter().map(|w| w.id().as_str()).collect();
    assert_eq!(ids, ["b", "a", "c"]);
}

#[test]
fn repeated_token_reuses_one_widget_and_binds_everywhere() {
    let source = "<h1>{{ label#title }}</h1><title>{{ label#title }}</title>";
    let mut widgets = parse(source).expect("parse");
    assert_eq!(widgets.len(), 1);

    widgets.set("title", "text", "Hi").expect("write");
    assert_eq!(
        bind(source, &widgets),
        r#"<h1><p id="title" class="widget">Hi</p></h1><title><p id="title" class="widget">Hi</p></title>"#
    );
}

#[test]
fn unknown_kind_fails() {
    assert_eq!(
        parse("<div>{{ slider#volume }}</div>").map(|w| w.len()),
        Err(RattleError::UnknownWidgetKind {
            kind: "slider".into()
        })
    );
}

#[test]
fn id_under_two_kinds_fails() {
    assert_eq!(
        parse("{{ input#x }}{{ label#x }}").map(|w| w.len()),
        Err(RattleError::DuplicateWidgetId {
            id: "x".into(),
            existing: WidgetKind::Input,
            requested: WidgetKind::Label,
        })
    );
}

#[test]
fn round_trip_keeps_surrounding_text_byte_identical() {
    let source = "<html>\n  <body>\u{e9}t\u{e9} {{ input#a }} & {{ label#b }}!\n</body>\n</html>\n";
    let widgets = parse(source).expect("parse");
    let html = bind(source, &widgets);

    let expected = source
        .replace("{{ input#a }}", widgets.get("a").expect("a").render())
        .replace("{{ label#b }}", widgets.get("b").expect("b").render());
    assert_eq!(html, expected);
}

#[test]
fn template_without_placeholders_is_unchanged() {
    let source = "<p>{{ not a token }} {{nospace#x}} {{ a#b#c }} {{ #x }}</p>";
    let widgets = parse(source).expect("parse");
    assert!(widgets.is_empty());
    assert_eq!(bind(source, &widgets), source);
}

#[test]
fn token_split_across_lines_is_text() {
    let source = "{{ input#a\n }}";
    assert!(parse(source).expect("parse").is_empty());
}

#[test]
fn scan_recovers_after_an_invalid_opening() {
    let source = "{{ oops {{ label#x }}";
    let found: Vec<(&str, &str)> = placeholders(source).map(|p| (p.kind, p.id)).collect();
    assert_eq!(found, [("label", "x")]);

    let widgets = parse(source).expect("parse");
    assert_eq!(
        bind(source, &widgets),
        r#"{{ oops <p id="x" class="widget"></p>"#
    );
}

#[test]
fn placeholder_spans_cover_the_whole_token() {
    let source = "ab{{ input#n }}cd";
    let placeholder = placeholders(source).next().expect("token");
    assert_eq!(&source[placeholder.span], "{{ input#n }}");
}

#[test]
fn binding_is_independent_of_widget_order() {
    let forward = "{{ input#a }}|{{ label#b }}";
    let backward = "{{ label#b }}|{{ input#a }}";

    let mut first = parse(forward).expect("parse");
    let mut second = parse(backward).expect("parse");
    for widgets in [&mut first, &mut second] {
        widgets.set("a", "value", "1").expect("a");
        widgets.set("b", "text", "2").expect("b");
    }

    let a = first.get("a").expect("a").render().to_string();
    let b = first.get("b").expect("b").render().to_string();
    assert_eq!(bind(forward, &first), format!("{a}|{b}"));
    assert_eq!(bind(forward, &second), format!("{a}|{b}"));
    assert_eq!(bind(backward, &first), format!("{b}|{a}"));
}

#[test]
fn markup_that_looks_like_a_placeholder_is_not_rescanned() {
    let source = "{{ label#a }}{{ input#b }}";
    let mut widgets = parse(source).expect("parse");
    widgets.set("a", "text", "{{ input#b }}").expect("write");

    assert_eq!(
        bind(source, &widgets),
        r#"<p id="a" class="widget">{{ input#b }}</p><input type="text" id="b" class="widget">"#
    );
}

#[test]
fn token_with_mismatched_kind_is_left_alone() {
    let widgets = parse("{{ input#a }}").expect("parse");
    assert_eq!(bind("{{ label#a }}", &widgets), "{{ label#a }}");
}
