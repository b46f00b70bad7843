//! Tests for source documents.

use super::*;
use crate::error::AgentwireError;
use tempfile::TempDir;

const SAMPLE: &str = r#"import agentstack


# keep this comment
@CrewBase
class SampleCrew:
    @agent
    def writer(self) -> Agent:
        return Agent(
            config=self.agents_config['writer'],
            tools=[*agentstack.tools['search']],  # bound tools
        )
"#;

#[test]
fn test_load_roundtrips_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("crew.py");
    std::fs::write(&path, SAMPLE).unwrap();

    let doc = SourceDocument::load(&path).unwrap();

    assert_eq!(doc.serialize(), SAMPLE);
    assert_eq!(doc.path(), Some(path.as_path()));
}

#[test]
fn test_load_rejects_invalid_python() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("crew.py");
    std::fs::write(&path, "def broken(:\n    pass\n").unwrap();

    let err = SourceDocument::load(&path).unwrap_err();

    assert!(matches!(err, AgentwireError::ParseError(_)));
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_load_missing_file_is_user_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = SourceDocument::load(temp_dir.path().join("missing.py")).unwrap_err();
    assert!(matches!(err, AgentwireError::UserError(_)));
}

#[test]
fn test_find_is_lazy_and_in_document_order() {
    let doc = SourceDocument::parse(SAMPLE).unwrap();

    let identifiers: Vec<&str> = doc
        .find(|n| n.kind() == "identifier")
        .take(3)
        .map(|n| doc.text(&n))
        .collect();

    assert_eq!(identifiers, vec!["agentstack", "CrewBase", "SampleCrew"]);
}

#[test]
fn test_find_restarts_against_current_tree() {
    let mut doc = SourceDocument::parse("a = [1]\n").unwrap();
    assert_eq!(doc.find(|n| n.kind() == "integer").count(), 1);

    let list = doc.find(|n| n.kind() == "list").next().map(|n| Span::of(&n));
    doc.replace_region(list.unwrap(), "[1, 2, 3]").unwrap();

    assert_eq!(doc.find(|n| n.kind() == "integer").count(), 3);
}

#[test]
fn test_find_within_stays_in_scope() {
    let doc = SourceDocument::parse("x = f(1)\ny = g(2)\n").unwrap();
    let second = doc.find(|n| n.kind() == "call").nth(1).unwrap();

    let ints: Vec<&str> = doc
        .find_within(second, |n| n.kind() == "integer")
        .map(|n| doc.text(&n))
        .collect();

    assert_eq!(ints, vec!["2"]);
}

#[test]
fn test_replace_region_preserves_surrounding_bytes() {
    let mut doc = SourceDocument::parse(SAMPLE).unwrap();
    let list = doc.find(|n| n.kind() == "list").next().unwrap();
    let span = Span::of(&list);

    doc.replace_region(span, "[]").unwrap();

    let expected = SAMPLE.replace("[*agentstack.tools['search']]", "[]");
    assert_eq!(doc.serialize(), expected);
    assert!(doc.serialize().contains("# keep this comment"));
    assert!(doc.serialize().contains("# bound tools"));
}

#[test]
fn test_replace_region_rejects_invalid_result() {
    let mut doc = SourceDocument::parse(SAMPLE).unwrap();
    let list = doc.find(|n| n.kind() == "list").next().unwrap();
    let span = Span::of(&list);

    let err = doc.replace_region(span, "[*agentstack.tools['search'],,]").unwrap_err();

    assert!(matches!(err, AgentwireError::MutationError(_)));
    assert_eq!(doc.serialize(), SAMPLE);
}

#[test]
fn test_replace_region_rejects_out_of_bounds_span() {
    let mut doc = SourceDocument::parse("x = 1\n").unwrap();
    let err = doc
        .replace_region(Span { start: 2, end: 100 }, "y")
        .unwrap_err();
    assert!(matches!(err, AgentwireError::MutationError(_)));
}

#[test]
fn test_insert_at_adds_text() {
    let mut doc = SourceDocument::parse("x = 1\n").unwrap();
    doc.insert_at(6, "y = 2\n").unwrap();
    assert_eq!(doc.serialize(), "x = 1\ny = 2\n");
}

#[test]
fn test_node_at_resolves_exact_span() {
    let doc = SourceDocument::parse("x = [a, b]\n").unwrap();
    let span = Span::of(&doc.find(|n| n.kind() == "list").next().unwrap());

    let node = doc.node_at(span, "list").unwrap();

    assert_eq!(doc.text(&node), "[a, b]");
    assert!(doc.node_at(Span { start: 0, end: 3 }, "list").is_none());
}

#[test]
fn test_line_indent() {
    let doc = SourceDocument::parse(SAMPLE).unwrap();
    let offset = SAMPLE.find("@agent").unwrap();
    assert_eq!(doc.line_indent(offset), "    ");
    assert_eq!(doc.line_indent(0), "");
}

#[test]
fn test_line_number() {
    let doc = SourceDocument::parse(SAMPLE).unwrap();
    assert_eq!(doc.line_number(0), 1);
    assert_eq!(doc.line_number(SAMPLE.find("@CrewBase").unwrap()), 5);
    assert_eq!(doc.line_number(usize::MAX), SAMPLE.lines().count() + 1);
}

#[test]
fn test_save_writes_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("crew.py");
    std::fs::write(&path, "x = 1\n").unwrap();

    let mut doc = SourceDocument::load(&path).unwrap();
    doc.insert_at(6, "y = 2\n").unwrap();
    doc.save().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 1\ny = 2\n");
}

#[test]
fn test_save_without_path_fails() {
    let doc = SourceDocument::parse("x = 1\n").unwrap();
    assert!(matches!(doc.save(), Err(AgentwireError::UserError(_))));
}

#[test]
fn test_decorator_names() {
    let doc = SourceDocument::parse(
        "@agentstack.agent\n@CrewBase()\n@ task\ndef f(self):\n    pass\n",
    )
    .unwrap();
    let decorated = doc
        .find(|n| n.kind() == "decorated_definition")
        .next()
        .unwrap();

    assert_eq!(
        doc.decorator_names(&decorated),
        vec!["agentstack.agent", "CrewBase", "task"]
    );
}

#[test]
fn test_callee_and_keyword_value() {
    let doc = SourceDocument::parse("a = llm.bind_tools([x], strict=True)\n").unwrap();
    let call = doc.find(|n| n.kind() == "call").next().unwrap();

    assert_eq!(doc.callee_name(&call), Some("bind_tools"));
    let strict = doc.keyword_value(&call, "strict").unwrap();
    assert_eq!(doc.text(&strict), "True");
    assert!(doc.keyword_value(&call, "tools").is_none());

    let positional = doc.positional_arguments(&call);
    assert_eq!(positional.len(), 1);
    assert_eq!(doc.text(&positional[0]), "[x]");
}

#[test]
fn test_string_value() {
    let doc = SourceDocument::parse("a = ['plain', \"double\", f'{x}']\n").unwrap();
    let values: Vec<Option<&str>> = doc
        .find(|n| n.kind() == "string")
        .map(|n| doc.string_value(&n))
        .collect();

    assert_eq!(values, vec![Some("plain"), Some("double"), None]);
}

#[test]
fn test_self_member() {
    let doc = SourceDocument::parse("t = Task(agent=self.writer(), other=obj.writer)\n").unwrap();
    let call = doc
        .find(|n| n.kind() == "call" && doc.callee_name(n) == Some("Task"))
        .next()
        .unwrap();

    let agent = doc.keyword_value(&call, "agent").unwrap();
    let other = doc.keyword_value(&call, "other").unwrap();

    assert_eq!(doc.self_member(&agent), Some("writer"));
    assert_eq!(doc.self_member(&other), None);
}
