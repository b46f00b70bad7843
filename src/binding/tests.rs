//! Tests for tool binding edits.

use super::*;
use crate::locate::{EntryShape, KeywordShape, LinkedSiteShape, ShapeRules, SiteShape};

const CREW_RULES: ShapeRules = ShapeRules {
    container_decorator: "CrewBase",
    agent_decorator: "agent",
    task_decorator: "task",
    entry: EntryShape::Decorated("crew"),
    tool_site: SiteShape::KeywordList(KeywordShape {
        callee: "Agent",
        keyword: "tools",
    }),
    linked_sites: &[],
    task_agent_keyword: None,
};

const GRAPH_RULES: ShapeRules = ShapeRules {
    container_decorator: "agentstack.graph",
    agent_decorator: "agentstack.agent",
    task_decorator: "agentstack.task",
    entry: EntryShape::Named("run"),
    tool_site: SiteShape::PositionalList {
        callee: "bind_tools",
    },
    linked_sites: &[LinkedSiteShape {
        registrar: "add_node",
        suffix: "_tools",
        site: SiteShape::PositionalList { callee: "ToolNode" },
    }],
    task_agent_keyword: None,
};

const CREW: &str = r#"@CrewBase
class DemoCrew:
    @agent
    def researcher(self) -> Agent:
        return Agent(
            config=self.agents_config['researcher'],
            tools=[],  # managed
        )

    @agent
    def writer(self) -> Agent:
        return Agent(
            tools=[
                *agentstack.tools['search'],
                custom_tool,
            ],
        )

    @agent
    def bare(self) -> Agent:
        return Agent(config=self.agents_config['bare'])

    @crew
    def crew(self) -> Crew:
        return Crew(agents=self.agents, tasks=self.tasks)
"#;

const GRAPH: &str = r#"@agentstack.graph
class DemoGraph:
    @agentstack.agent
    def researcher(self, state):
        agent = ChatOpenAI()
        agent = agent.bind_tools([])
        return {'messages': [agent.invoke(state['messages'])]}

    def run(self, inputs):
        self.graph.add_node('researcher', self.researcher)
        self.graph.add_node('researcher_tools', ToolNode([]))
"#;

fn tool(name: &str) -> ToolRecord {
    ToolRecord::new(name, "test", vec![name.to_string()]).unwrap()
}

#[test]
fn test_tool_reference_text() {
    assert_eq!(tool_reference("search"), "*agentstack.tools['search']");
}

#[test]
fn test_add_appends_to_single_line_list() {
    let mut doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    assert!(editor.add(&mut doc, "researcher", &tool("search")).unwrap());
    assert!(editor.add(&mut doc, "researcher", &tool("scrape")).unwrap());

    let expected = CREW.replace(
        "tools=[],  # managed",
        "tools=[*agentstack.tools['search'], *agentstack.tools['scrape']],  # managed",
    );
    assert_eq!(doc.serialize(), expected);
}

#[test]
fn test_add_is_idempotent() {
    let mut doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.add(&mut doc, "researcher", &tool("search")).unwrap();
    let once = doc.serialize().to_string();
    assert!(!editor.add(&mut doc, "researcher", &tool("search")).unwrap());

    assert_eq!(doc.serialize(), once);
    assert_eq!(editor.tool_names(&doc, "researcher").unwrap(), vec!["search"]);
}

#[test]
fn test_add_keeps_multiline_layout_and_foreign_entries() {
    let mut doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.add(&mut doc, "writer", &tool("scrape")).unwrap();

    let expected = CREW.replace(
        "                custom_tool,\n            ],",
        "                custom_tool,\n                *agentstack.tools['scrape'],\n            ],",
    );
    assert_eq!(doc.serialize(), expected);
    assert_eq!(
        editor.tool_names(&doc, "writer").unwrap(),
        vec!["search", "scrape"]
    );
}

#[test]
fn test_add_without_site_is_validation_error() {
    let mut doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    let err = editor.add(&mut doc, "bare", &tool("search")).unwrap_err();
    assert!(matches!(err, AgentwireError::ValidationError(_)));

    let err = editor.add(&mut doc, "missing", &tool("search")).unwrap_err();
    assert!(matches!(err, AgentwireError::ValidationError(_)));
    assert_eq!(doc.serialize(), CREW);
}

#[test]
fn test_remove_deletes_only_matching_entry() {
    let mut doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    assert!(editor.remove(&mut doc, "writer", &tool("search")).unwrap());

    assert!(!doc.serialize().contains("*agentstack.tools['search']"));
    assert!(doc.serialize().contains("custom_tool,"));
    assert!(editor.tool_names(&doc, "writer").unwrap().is_empty());
}

#[test]
fn test_remove_absent_is_noop() {
    let mut doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    assert!(!editor.remove(&mut doc, "researcher", &tool("search")).unwrap());
    assert!(!editor.remove(&mut doc, "bare", &tool("search")).unwrap());
    assert!(!editor.remove(&mut doc, "missing", &tool("search")).unwrap());
    assert_eq!(doc.serialize(), CREW);
}

#[test]
fn test_remove_one_of_two_leaves_the_other() {
    let mut doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.add(&mut doc, "researcher", &tool("search")).unwrap();
    editor.add(&mut doc, "researcher", &tool("scrape")).unwrap();
    editor.remove(&mut doc, "researcher", &tool("search")).unwrap();

    assert!(doc.serialize().contains("tools=[*agentstack.tools['scrape']],"));
    assert_eq!(editor.tool_names(&doc, "researcher").unwrap(), vec!["scrape"]);
}

#[test]
fn test_tool_names_missing_site_is_validation_error() {
    let doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    assert!(editor.tool_names(&doc, "researcher").unwrap().is_empty());
    assert!(matches!(
        editor.tool_names(&doc, "bare"),
        Err(AgentwireError::ValidationError(_))
    ));
}

#[test]
fn test_linked_site_stays_in_sync() {
    let mut doc = SourceDocument::parse(GRAPH).unwrap();
    let locator = StructuralLocator::new(GRAPH_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.add(&mut doc, "researcher", &tool("search")).unwrap();

    assert!(doc
        .serialize()
        .contains("agent.bind_tools([*agentstack.tools['search']])"));
    assert!(doc
        .serialize()
        .contains("ToolNode([*agentstack.tools['search']])"));

    editor.remove(&mut doc, "researcher", &tool("search")).unwrap();
    assert_eq!(doc.serialize(), GRAPH);
}

#[test]
fn test_binding_entries_recognise_only_tool_references() {
    let doc = SourceDocument::parse(CREW).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let site = locator.find_tool_binding_site(&doc, "writer").unwrap();

    let entries = binding_entries(&doc, &site).unwrap();

    let summary: Vec<(&str, Option<&str>)> = entries
        .iter()
        .map(|e| (e.text.as_str(), e.tool.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("*agentstack.tools['search']", Some("search")),
            ("custom_tool", None),
        ]
    );
    assert_eq!(doc.span_text(entries[1].span), "custom_tool");
}

fn crew_with_tools(list: &str) -> String {
    CREW.replace("tools=[],  # managed", &format!("tools={},", list))
}

#[test]
fn test_add_keeps_comments_inside_list() {
    let source = crew_with_tools(
        "[\n                # web search, keep first\n                *agentstack.tools['search'],\n            ]",
    );
    let mut doc = SourceDocument::parse(source.as_str()).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.add(&mut doc, "researcher", &tool("scrape")).unwrap();

    let expected = crew_with_tools(
        "[\n                # web search, keep first\n                *agentstack.tools['search'],\n                *agentstack.tools['scrape'],\n            ]",
    );
    assert_eq!(doc.serialize(), expected);
}

#[test]
fn test_add_after_last_element_with_trailing_comment() {
    let source = crew_with_tools(
        "[\n                *agentstack.tools['search']  # primary\n            ]",
    );
    let mut doc = SourceDocument::parse(source.as_str()).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.add(&mut doc, "researcher", &tool("scrape")).unwrap();

    let expected = crew_with_tools(
        "[\n                *agentstack.tools['search'],  # primary\n                *agentstack.tools['scrape']\n            ]",
    );
    assert_eq!(doc.serialize(), expected);
}

#[test]
fn test_add_to_empty_list_holding_only_a_comment() {
    let source = crew_with_tools("[\n                # nothing yet\n            ]");
    let mut doc = SourceDocument::parse(source.as_str()).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.add(&mut doc, "researcher", &tool("search")).unwrap();

    assert!(doc.serialize().contains("# nothing yet"));
    assert_eq!(editor.tool_names(&doc, "researcher").unwrap(), vec!["search"]);
}

#[test]
fn test_remove_keeps_comments_and_other_entries() {
    let list = "[\n                # web search, keep first\n                *agentstack.tools['search'],\n                # scraping\n                *agentstack.tools['scrape'],\n            ]";
    let mut doc = SourceDocument::parse(crew_with_tools(list)).unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.remove(&mut doc, "researcher", &tool("scrape")).unwrap();

    let expected = crew_with_tools(
        "[\n                # web search, keep first\n                *agentstack.tools['search'],\n                # scraping\n            ]",
    );
    assert_eq!(doc.serialize(), expected);
}

#[test]
fn test_remove_keeps_separators_of_remaining_entries() {
    let mut doc = SourceDocument::parse(crew_with_tools(
        "[*agentstack.tools['x'],custom,*agentstack.tools['y']]",
    ))
    .unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.remove(&mut doc, "researcher", &tool("y")).unwrap();
    assert_eq!(
        doc.serialize(),
        crew_with_tools("[*agentstack.tools['x'],custom]")
    );

    editor.remove(&mut doc, "researcher", &tool("x")).unwrap();
    assert_eq!(doc.serialize(), crew_with_tools("[custom]"));
}

#[test]
fn test_remove_last_entry_without_trailing_comma() {
    let mut doc = SourceDocument::parse(crew_with_tools(
        "[\n                custom,\n                *agentstack.tools['search']\n            ]",
    ))
    .unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    editor.remove(&mut doc, "researcher", &tool("search")).unwrap();

    assert_eq!(
        doc.serialize(),
        crew_with_tools("[\n                custom\n            ]")
    );
}

#[test]
fn test_remove_duplicate_entries() {
    let mut doc = SourceDocument::parse(crew_with_tools(
        "[*agentstack.tools['x'], *agentstack.tools['x']]",
    ))
    .unwrap();
    let locator = StructuralLocator::new(CREW_RULES);
    let editor = ToolBindingEditor::new(&locator);

    assert!(editor.remove(&mut doc, "researcher", &tool("x")).unwrap());
    assert_eq!(doc.serialize(), crew_with_tools("[]"));
}

#[test]
fn test_remove_cleans_linked_site_without_primary_site() {
    let source = GRAPH
        .replace("        agent = agent.bind_tools([])\n", "")
        .replace("ToolNode([])", "ToolNode([*agentstack.tools['search']])");
    let mut doc = SourceDocument::parse(source.as_str()).unwrap();
    let locator = StructuralLocator::new(GRAPH_RULES);
    let editor = ToolBindingEditor::new(&locator);

    // a linked site alone cannot take new tools
    let err = editor.add(&mut doc, "researcher", &tool("scrape")).unwrap_err();
    assert!(matches!(err, AgentwireError::ValidationError(_)));

    assert!(editor.remove(&mut doc, "researcher", &tool("search")).unwrap());
    assert!(doc.serialize().contains("ToolNode([])"));
}
