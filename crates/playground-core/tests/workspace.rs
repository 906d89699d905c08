use playground_core::{
    Diagnostic, DiagnosticParser, KeyInput, KeyOutcome, OutputLine, Position, Resource,
    TextBuffer, TextRange, Workspace, WorkspaceError,
};
use playground_lang::{CommentConfig, MarkerSyntax};
use pretty_assertions::assert_eq;

fn example() -> Vec<Resource> {
    vec![
        Resource::new(
            "main.adb",
            "with Greet;\n-- begin readonly\nprocedure Main is\nbegin\n-- end readonly\n   Greet;\nend Main;\n",
        ),
        Resource::new(
            "greet.adb",
            "-- #region Body\nprocedure Greet is\nbegin\n   null;\nend Greet;\n-- #endregion Body\n",
        ),
    ]
}

fn open() -> Workspace {
    let mut ws = Workspace::new(MarkerSyntax::new(CommentConfig::ada()));
    ws.open(example()).unwrap();
    ws
}

#[test]
fn test_open_extracts_markers_for_every_resource() {
    let ws = open();
    assert_eq!(ws.len(), 2);
    assert_eq!(ws.active().unwrap().basename(), "main.adb");

    let main = ws.editor("main.adb").unwrap();
    assert_eq!(
        main.buffer().text(),
        "with Greet;\nprocedure Main is\nbegin\n   Greet;\nend Main;\n"
    );
    assert_eq!(
        main.buffer().regions(),
        vec![TextRange::new(Position::new(1, 0), Position::new(2, 5))]
    );

    let greet = ws.editor("greet.adb").unwrap();
    assert_eq!(greet.folds().len(), 1);
    assert_eq!(greet.folds()[0].name, "Body");
    assert!(greet.folds()[0].contains_line(3));
    assert!(greet.buffer().regions().is_empty());
}

#[test]
fn test_resources_reflect_edits_and_reset_restores_them() {
    let mut ws = open();
    let main = ws.editor_mut("main.adb").unwrap();
    assert!(main.buffer_mut().insert(Position::new(3, 9), " -- hello").is_some());
    assert!(main.buffer_mut().insert(Position::new(1, 3), "x").is_none());

    assert!(ws.editor("main.adb").unwrap().is_modified());
    assert!(!ws.editor("greet.adb").unwrap().is_modified());

    let sent = ws.resources();
    assert_eq!(sent[0].basename, "main.adb");
    assert_eq!(
        sent[0].contents,
        "with Greet;\nprocedure Main is\nbegin\n   Greet; -- hello\nend Main;\n"
    );

    ws.reset();
    let main = ws.editor("main.adb").unwrap();
    assert_eq!(
        main.buffer().text(),
        "with Greet;\nprocedure Main is\nbegin\n   Greet;\nend Main;\n"
    );
    assert_eq!(main.buffer().regions().len(), 1);
    assert_eq!(main.cursor(), Position::default());
}

#[test]
fn test_toolchain_output_navigates_to_the_reported_location() {
    let mut ws = open();
    let mut parser = DiagnosticParser::new();
    let lines = [
        "gcc -c greet.adb",
        "greet.adb:4:4: error: missing \";\"",
        "gnatmake: \"greet.adb\" compilation error",
    ];
    let diagnostics: Vec<Diagnostic> = lines
        .iter()
        .filter_map(|l| match parser.parse_line(l) {
            OutputLine::Diagnostic(d) => Some(d),
            OutputLine::Text(_) => None,
        })
        .collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(parser.summary(0).to_string(), "one error");

    ws.apply_diagnostics(&diagnostics);
    assert!(ws.navigate(&diagnostics[0]));

    let greet = ws.active().unwrap();
    assert_eq!(greet.basename(), "greet.adb");
    assert_eq!(greet.cursor(), Position::new(3, 3));
    assert!(greet.is_focused());
    assert_eq!(greet.diagnostics().len(), 1);
}

#[test]
fn test_set_active_rejects_unknown_resource() {
    let mut ws = open();
    assert_eq!(
        ws.set_active("nope.adb"),
        Err(WorkspaceError::UnknownResource("nope.adb".to_string()))
    );
    ws.set_active("greet.adb").unwrap();
    assert_eq!(ws.active().unwrap().basename(), "greet.adb");
}

#[test]
fn test_markers_follow_each_resource_language() {
    let mut ws = Workspace::new(MarkerSyntax::new(CommentConfig::ada()));
    ws.open(vec![
        Resource::new(
            "main.adb",
            "-- begin readonly\nprocedure Main;\n-- end readonly\n",
        ),
        Resource::new(
            "util.c",
            "// begin readonly\nint f(void);\n// end readonly\nint g;\n",
        ),
        Resource::new("notes.txt", "-- begin readonly\nkeep\n-- end readonly\n"),
    ])
    .unwrap();

    let util = ws.editor("util.c").unwrap();
    assert_eq!(util.buffer().text(), "int f(void);\nint g;\n");
    assert_eq!(
        util.buffer().regions(),
        vec![TextRange::new(Position::new(0, 0), Position::new(0, 12))]
    );
    assert_eq!(util.extractor().syntax().comments, CommentConfig::line("//"));

    let notes = ws.editor("notes.txt").unwrap();
    assert_eq!(notes.buffer().text(), "keep\n");
    assert_eq!(notes.buffer().regions().len(), 1);

    ws.editor_mut("util.c")
        .unwrap()
        .buffer_mut()
        .insert(Position::new(1, 6), " = 1");
    ws.reset();
    let util = ws.editor("util.c").unwrap();
    assert_eq!(util.buffer().text(), "int f(void);\nint g;\n");
    assert_eq!(util.buffer().regions().len(), 1);
}

#[test]
fn test_crlf_resources_are_sent_with_crlf() {
    let mut ws = Workspace::new(MarkerSyntax::new(CommentConfig::ada()));
    ws.open(vec![Resource::new(
        "main.adb",
        "-- begin readonly\r\nprocedure Main is\r\n-- end readonly\r\nbegin\r\n   null;\r\nend Main;\r\n",
    )])
    .unwrap();

    let main = ws.editor_mut("main.adb").unwrap();
    assert_eq!(main.buffer().regions()[0].end, Position::new(0, 17));
    assert_eq!(
        main.buffer().handle_key(&KeyInput::Enter, Position::new(0, 17)),
        KeyOutcome::Swallowed
    );
    assert!(main.buffer_mut().insert(Position::new(0, 16), "x").is_none());
    assert!(main.buffer_mut().insert(Position::new(2, 8), " -- ok").is_some());

    assert_eq!(
        ws.resources()[0].contents,
        "procedure Main is\r\nbegin\r\n   null; -- ok\r\nend Main;\r\n"
    );
    assert!(ws.initial_resources()[0].contents.starts_with("-- begin readonly\r\n"));
}

#[test]
fn test_override_keeps_protection_of_other_resources() {
    let mut ws = open();
    ws.override_resources(vec![Resource::new(
        "greet.adb",
        "-- begin readonly\nprocedure Greet is\n-- end readonly\nbegin\n   null;\nend Greet;\n",
    )])
    .unwrap();

    let main = ws.editor("main.adb").unwrap();
    assert_eq!(
        main.buffer().regions(),
        vec![TextRange::new(Position::new(1, 0), Position::new(2, 5))]
    );
    assert_eq!(main.initial_resource(), example()[0]);

    let greet = ws.editor("greet.adb").unwrap();
    assert_eq!(greet.buffer().text(), "procedure Greet is\nbegin\n   null;\nend Greet;\n");
    assert_eq!(greet.buffer().regions().len(), 1);

    ws.reset();
    assert_eq!(ws.editor("main.adb").unwrap().buffer().regions().len(), 1);

    assert_eq!(
        ws.override_resources(vec![Resource::new("other.adb", "")]),
        Err(WorkspaceError::UnknownResource("other.adb".to_string()))
    );
    assert_eq!(ws.len(), 2);
}
