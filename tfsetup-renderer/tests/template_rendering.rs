use rstest::rstest;
use tfsetup_core::RenderingContext;
use tfsetup_renderer::{RenderError, TemplateEngine};

const GREETING: &str = "# Hello, {{ Config.name }} at {{ Path }}.
{% if Project.things %}# Things:
{%- for thing in Project.things %}
# • {{ thing }}, {{ thing | upper }}
{%- endfor %}
{% endif -%}
";

fn context(project: &str, path: &str) -> RenderingContext {
    RenderingContext::from_bytes(
        project.as_bytes(),
        br#"{"name": "Potato"}"#,
        path,
        "/code/tfsetup-config",
    )
    .expect("context")
}

fn render(source: &str, ctx: &RenderingContext) -> String {
    let bytes = TemplateEngine::new()
        .render("input", source, ctx)
        .unwrap_or_else(|e| panic!("render failed: {e}"));
    String::from_utf8(bytes).expect("utf-8 output")
}

// ---------------------------------------------------------------------------
// 1. Context composition
// ---------------------------------------------------------------------------

#[test]
fn greeting_lists_things_with_uppercase() {
    let ctx = context(r#"{"things": ["a", "b"]}"#, "cd/ef");
    assert_eq!(
        render(GREETING, &ctx),
        "# Hello, Potato at cd/ef.\n# Things:\n# • a, A\n# • b, B\n"
    );
}

#[test]
fn greeting_uses_relative_path() {
    let ctx = context(r#"{"things": ["a", "b"]}"#, "x/y/z");
    assert_eq!(
        render(GREETING, &ctx),
        "# Hello, Potato at x/y/z.\n# Things:\n# • a, A\n# • b, B\n"
    );
}

#[rstest]
#[case(r#"{"things": []}"#)]
#[case(r#"{}"#)]
fn greeting_without_things_omits_section(#[case] project: &str) {
    let ctx = context(project, "p");
    assert_eq!(render(GREETING, &ctx), "# Hello, Potato at p.\n");
}

#[test]
fn rendering_twice_is_byte_identical() {
    let ctx = context(r#"{"things": ["a", "b", "c"]}"#, "cd/ef");
    let engine = TemplateEngine::new();
    let first = engine.render("input", GREETING, &ctx).expect("first");
    let second = engine.render("input", GREETING, &ctx).expect("second");
    assert_eq!(first, second);
}

#[test]
fn rendering_does_not_mutate_context() {
    let ctx = context(r#"{"things": ["a"]}"#, "cd");
    let before = ctx.clone();
    render("{% set x = Project.things | length %}{{ x }}", &ctx);
    assert_eq!(ctx, before);
}

// ---------------------------------------------------------------------------
// 2. Function library
// ---------------------------------------------------------------------------

#[rstest]
#[case("{{ Config.name | upper }}", "POTATO")]
#[case("{{ Config.name | lower }}", "potato")]
#[case("{{ '-' | repeat(count=5) }}", "-----")]
#[case("{{ Project.things | join(sep=',') }}", "a,b")]
#[case("{{ Project.things | reverse | join(sep='') }}", "ba")]
#[case("{{ Project.things | length }}", "2")]
#[case("{{ Project.things | first }}", "a")]
#[case("{{ Config.name | quote }}", "\"Potato\"")]
#[case("{{ 'MyBucket name' | snakecase }}", "my_bucket_name")]
#[case("{{ 'MyBucket name' | kebabcase }}", "my-bucket-name")]
#[case("{{ 'my_bucket' | camelcase }}", "MyBucket")]
#[case("{{ 'v1.2.3' | trim_prefix(prefix='v') }}", "1.2.3")]
#[case("{{ Config | keys | join(sep=' ') }}", "name")]
#[case("{{ Config | has_key(key='name') }}", "true")]
#[case("{{ Project.missing | default(value='none') }}", "none")]
#[case("{{ Project.things | ternary(yes='some', no='none') }}", "some")]
#[case("{{ Config.name | b64enc }}", "UG90YXRv")]
#[case("{{ 'UG90YXRv' | b64dec }}", "Potato")]
#[case(
    "{{ Config.name | sha256sum }}",
    "6d61374da4b4df53c6f8fbf4c9b05576d647a07da7498b400abaf7e1f4f44124"
)]
#[case(
    r"{{ 'eu-west-1' | regex_replace(pattern='-(\d+)$', replacement='_$1') }}",
    "eu-west_1"
)]
fn utility_functions(#[case] source: &str, #[case] expected: &str) {
    let ctx = context(r#"{"things": ["a", "b"]}"#, "p");
    assert_eq!(render(source, &ctx), expected);
}

#[test]
fn nindent_formats_blocks() {
    let ctx = context(r#"{"tags": "a = 1\nb = 2"}"#, "p");
    let out = render("tags {{ Project.tags | nindent(width=2) }}", &ctx);
    assert_eq!(out, "tags \n  a = 1\n  b = 2");
}

// ---------------------------------------------------------------------------
// 3. Errors
// ---------------------------------------------------------------------------

#[test]
fn malformed_syntax_is_parse_error() {
    let ctx = context("{}", "p");
    let err = TemplateEngine::new()
        .render("setup.tmpl", "{{ Config.name ", &ctx)
        .unwrap_err();
    assert!(matches!(err, RenderError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("setup.tmpl"), "got: {err}");
}

#[test]
fn unknown_filter_is_reported_with_name() {
    let ctx = context("{}", "p");
    let err = TemplateEngine::new()
        .render("a.txt.tfsetup.tmpl", "{{ Config.name | no_such_filter }}", &ctx)
        .unwrap_err();
    assert_eq!(err.template_name(), Some("a.txt.tfsetup.tmpl"));
}

#[test]
fn field_of_nil_parent_is_eval_error() {
    let ctx = context(r#"{"parent": null}"#, "p");
    let err = TemplateEngine::new()
        .render("input", "{{ Project.parent.child }}", &ctx)
        .unwrap_err();
    assert!(matches!(err, RenderError::Eval { .. }), "got: {err}");
    assert!(err.to_string().contains("input"), "got: {err}");
}

#[test]
fn filter_argument_errors_surface_as_eval_errors() {
    let ctx = context("{}", "p");
    let err = TemplateEngine::new()
        .render("input", "{{ 'x' | repeat }}", &ctx)
        .unwrap_err();
    assert!(matches!(err, RenderError::Eval { .. }), "got: {err}");
    assert!(err.to_string().contains("count"), "got: {err}");
}
