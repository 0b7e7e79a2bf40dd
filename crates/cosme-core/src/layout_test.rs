use std::io::Write;

use super::*;

fn write_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write yaml");
    file
}

const EXTRA_LAYOUT_YAML: &str = r#"
layouts:
  - name: cosme-2025
    selectors:
      entry: ["div.review-item"]
      rating: ["span.score"]
      profile: ["div.profile"]
      body: ["div.text"]
      date: ["span.posted"]
    profile_format:
      kind: delimiter_split
      separator: middle_dot
"#;

#[test]
fn builtin_layouts_pass_validation() {
    let layouts = builtin_layouts();
    assert!(layouts.len() >= 6, "expected every known template");
    assert!(validate_layouts(&layouts).is_ok());
}

#[test]
fn builtin_layout_names_are_unique() {
    let layouts = builtin_layouts();
    let names: HashSet<_> = layouts.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names.len(), layouts.len());
}

#[test]
fn newest_builtin_is_probed_first() {
    assert_eq!(builtin_layouts()[0].name, "cosme-2024");
}

#[test]
fn only_rendered_template_needs_rendering() {
    let rendered: Vec<_> = builtin_layouts()
        .into_iter()
        .filter(Layout::needs_rendering)
        .map(|l| l.name)
        .collect();
    assert_eq!(rendered, vec!["cosme-rendered".to_owned()]);
}

#[test]
fn load_layouts_applies_serde_defaults() {
    let file = write_yaml(EXTRA_LAYOUT_YAML);
    let loaded = load_layouts(file.path()).unwrap();
    assert_eq!(loaded.layouts.len(), 1);

    let layout = &loaded.layouts[0];
    assert_eq!(layout.page_param, "page");
    assert_eq!(layout.listing_suffix, "/review/");
    assert_eq!(layout.rating_rule, RatingRule::Text);
    assert!(layout.selectors.read_more.is_empty());
    assert_eq!(
        layout.profile_format,
        ProfileFormat::DelimiterSplit {
            separator: Separator::MiddleDot
        }
    );
}

#[test]
fn load_layouts_reads_class_suffix_rule() {
    let file = write_yaml(
        r#"
layouts:
  - name: stars
    selectors:
      entry: ["li.review"]
    rating_rule:
      kind: class_suffix
      prefix: "icon-star-"
"#,
    );
    let loaded = load_layouts(file.path()).unwrap();
    assert_eq!(
        loaded.layouts[0].rating_rule,
        RatingRule::ClassSuffix {
            prefix: "icon-star-".to_owned()
        }
    );
}

#[test]
fn load_layouts_missing_file_is_io_error() {
    let result = load_layouts(Path::new("/definitely/not/here/layouts.yaml"));
    assert!(matches!(result, Err(ConfigError::LayoutsFileIo { .. })));
}

#[test]
fn load_layouts_invalid_yaml_is_parse_error() {
    let file = write_yaml("layouts: [not: valid: yaml");
    let result = load_layouts(file.path());
    assert!(matches!(result, Err(ConfigError::LayoutsFileParse(_))));
}

#[test]
fn load_layouts_rejects_empty_entry_selectors() {
    let file = write_yaml(
        r#"
layouts:
  - name: broken
    selectors:
      entry: []
"#,
    );
    let result = load_layouts(file.path());
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("entry selector")),
        "got: {result:?}"
    );
}

#[test]
fn validate_rejects_duplicate_names_case_insensitively() {
    let mut layouts = builtin_layouts();
    let mut dup = layouts[0].clone();
    dup.name = "COSME-2024".to_owned();
    layouts.push(dup);
    assert!(matches!(
        validate_layouts(&layouts),
        Err(ConfigError::Validation(ref msg)) if msg.contains("duplicate")
    ));
}

#[test]
fn validate_rejects_suffix_without_leading_slash() {
    let mut layout = builtin_layouts().remove(0);
    layout.listing_suffix = "review/".to_owned();
    assert!(validate_layouts(&[layout]).is_err());
}

#[test]
fn validate_rejects_empty_class_prefix() {
    let mut layout = builtin_layouts().remove(0);
    layout.rating_rule = RatingRule::ClassSuffix {
        prefix: String::new(),
    };
    assert!(validate_layouts(&[layout]).is_err());
}

#[test]
fn resolve_layouts_without_path_returns_builtins() {
    assert_eq!(resolve_layouts(None).unwrap(), builtin_layouts());
}

#[test]
fn resolve_layouts_appends_new_layouts() {
    let file = write_yaml(EXTRA_LAYOUT_YAML);
    let layouts = resolve_layouts(Some(file.path())).unwrap();
    assert_eq!(layouts.len(), builtin_layouts().len() + 1);
    assert_eq!(layouts.last().unwrap().name, "cosme-2025");
}

#[test]
fn resolve_layouts_replaces_builtin_in_place() {
    let file = write_yaml(
        r##"
layouts:
  - name: cosme-2024
    selectors:
      entry: ["#reviews > div.item"]
"##,
    );
    let layouts = resolve_layouts(Some(file.path())).unwrap();
    assert_eq!(layouts.len(), builtin_layouts().len());
    assert_eq!(layouts[0].name, "cosme-2024");
    assert_eq!(layouts[0].selectors.entry, vec!["#reviews > div.item".to_owned()]);
}
