use indoc::indoc;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xliffgen::traits::Parser;
use xliffgen::{Error, NoopNotifier, SyncOutcome, XliffDocument, sync_unit};

const MESSAGES: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
      <file source-language="en" target-language="en" datatype="plaintext" original="file.ext">
        <header>
          <tool tool-id="symfony" tool-name="Symfony"/>
        </header>
        <body>
          <trans-unit id="home.title" resname="home.title">
            <source>home.title</source>
            <target>Welcome</target>
            <note>Shown on the landing page</note>
          </trans-unit>
          <group id="footer">
            <trans-unit id="footer.copy">
              <source>footer.copy</source>
              <target>&#169; ACME</target>
            </trans-unit>
          </group>
          <trans-unit id="home.bye">
            <source>home.bye</source>
            <target><![CDATA[Good<bye>]]></target>
          </trans-unit>
        </body>
      </file>
    </xliff>
"#};

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn triples(path: &Path) -> Vec<(String, Option<String>, Option<String>)> {
    XliffDocument::read_from(path)
        .unwrap()
        .units()
        .unwrap()
        .into_iter()
        .map(|u| (u.id, u.source, u.target))
        .collect()
}

#[test]
fn test_non_xlf_path_fails_even_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("messages.xml");
    let err = sync_unit(&path, "a", "b", &NoopNotifier).unwrap_err();
    assert!(matches!(err, Error::InvalidFileType(_)));
    assert!(!path.exists());
}

#[test]
fn test_non_xlf_existing_file_is_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "messages.xliff", MESSAGES);
    let err = sync_unit(&path, "a", "b", &NoopNotifier).unwrap_err();
    assert!(matches!(err, Error::InvalidFileType(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), MESSAGES);
}

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("translations").join("messages.en.xlf");
    let err = sync_unit(&path, "a", "b", &NoopNotifier).unwrap_err();
    assert!(matches!(err, Error::NotFound(ref p) if p == &path));
}

#[test]
fn test_directory_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dir.xlf");
    fs::create_dir(&path).unwrap();
    let err = sync_unit(&path, "a", "b", &NoopNotifier).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_invalid_xml_is_parse_error_and_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let broken = "<xliff><file><body></file></xliff>";
    let path = write_fixture(&temp_dir, "broken.xlf", broken);
    let err = sync_unit(&path, "a", "b", &NoopNotifier).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(err.to_string().starts_with("failed to parse XLIFF file"));
    assert_eq!(fs::read_to_string(&path).unwrap(), broken);
}

#[test]
fn test_ill_formed_documents_are_parse_errors_and_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let cases = [
        ("lt_in_attribute.xlf", "<xliff><body a='<'></body></xliff>"),
        ("cdata_end.xlf", "<xliff><body>]]></body></xliff>"),
        ("bad_name.xlf", "<xliff><body><1x/></body></xliff>"),
        ("no_space.xlf", r#"<xliff><body a="1"b="2"></body></xliff>"#),
        ("control_char.xlf", "<xliff><body>\u{1}</body></xliff>"),
        ("late_decl.xlf", "<xliff><body/></xliff><?xml version='1.0'?>"),
        ("late_doctype.xlf", "<xliff><body/></xliff><!DOCTYPE x>"),
        ("comment.xlf", "<!-- a -- b --><xliff><body/></xliff>"),
    ];
    for (name, content) in cases {
        let path = write_fixture(&temp_dir, name, content);
        let err = sync_unit(&path, "a", "b", &NoopNotifier).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "{name}: {err:?}");
        assert_eq!(fs::read_to_string(&path).unwrap(), content, "{name}");
    }
}

#[test]
fn test_byte_order_mark_survives_sync() {
    let temp_dir = TempDir::new().unwrap();
    let content = format!("\u{FEFF}{}", MESSAGES);
    let path = write_fixture(&temp_dir, "messages.en.xlf", &content);

    let outcome = sync_unit(&path, "home.title", "Hello", &NoopNotifier).unwrap();
    assert_eq!(outcome, SyncOutcome::Updated);

    let written = fs::read(&path).unwrap();
    assert!(written.starts_with(&[0xEF, 0xBB, 0xBF]));
    let expected = content.replace("<target>Welcome</target>", "<target>Hello</target>");
    assert_eq!(String::from_utf8(written).unwrap(), expected);
}

#[test]
fn test_internal_subset_entity_in_target() {
    let temp_dir = TempDir::new().unwrap();
    let content = indoc! {r#"
        <?xml version="1.0"?>
        <!DOCTYPE xliff [<!ENTITY co "ACME">]>
        <xliff version="1.2">
          <file>
            <body>
              <trans-unit id="about.owner">
                <source>about.owner</source>
                <target>&co; Inc</target>
              </trans-unit>
            </body>
          </file>
        </xliff>
    "#};
    let path = write_fixture(&temp_dir, "messages.xlf", content);

    let outcome = sync_unit(&path, "about.owner", "ACME Inc", &NoopNotifier).unwrap();
    assert_eq!(outcome, SyncOutcome::Unchanged);
    assert_eq!(fs::read_to_string(&path).unwrap(), content);

    sync_unit(&path, "about.title", "About", &NoopNotifier).unwrap();
    let units = triples(&path);
    assert_eq!(units[0].2.as_deref(), Some("ACME Inc"));
    assert_eq!(units[1].0, "about.title");
}

#[test]
fn test_document_without_body_and_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let content = "<?xml version=\"1.0\"?>\n<xliff version=\"1.2\"><file/></xliff>\n";
    let path = write_fixture(&temp_dir, "nobody.xlf", content);
    let err = sync_unit(&path, "a", "b", &NoopNotifier).unwrap_err();
    assert!(matches!(err, Error::MissingBody));
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_unit_without_target_is_malformed_and_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let content = indoc! {r#"
        <xliff version="1.2">
          <file>
            <body>
              <trans-unit id="lonely"><source>lonely</source></trans-unit>
            </body>
          </file>
        </xliff>
    "#};
    let path = write_fixture(&temp_dir, "messages.xlf", content);
    let err = sync_unit(&path, "lonely", "text", &NoopNotifier).unwrap_err();
    assert!(matches!(err, Error::MalformedUnit(ref id) if id == "lonely"));
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_insert_appends_after_existing_units() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "messages.en.xlf", MESSAGES);

    let outcome = sync_unit(&path, "home.hello_world", "Hello World", &NoopNotifier).unwrap();
    assert_eq!(outcome, SyncOutcome::Inserted);

    let ids: Vec<_> = triples(&path).into_iter().map(|(id, _, _)| id).collect();
    assert_eq!(ids, ["home.title", "home.bye", "home.hello_world"]);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains(
        "\n    <trans-unit id=\"home.hello_world\">\
         \n        <source>home.hello_world</source>\
         \n        <target>Hello World</target>\
         \n    </trans-unit>\
         \n</body>"
    ));
    // Everything before the new unit is kept verbatim.
    let body_end = MESSAGES.find("</body>").unwrap();
    assert!(written.starts_with(&MESSAGES[..body_end]));
    assert!(written.ends_with(&MESSAGES[body_end..]));
}

#[test]
fn test_sync_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "messages.en.xlf", MESSAGES);

    sync_unit(&path, "cart.empty", "Your cart is empty", &NoopNotifier).unwrap();
    let after_first = fs::read_to_string(&path).unwrap();

    let outcome = sync_unit(&path, "cart.empty", "Your cart is empty", &NoopNotifier).unwrap();
    assert_eq!(outcome, SyncOutcome::Unchanged);
    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);

    let matching: Vec<_> = triples(&path)
        .into_iter()
        .filter(|(id, _, _)| id == "cart.empty")
        .collect();
    assert_eq!(
        matching,
        [(
            "cart.empty".to_string(),
            Some("cart.empty".to_string()),
            Some("Your cart is empty".to_string())
        )]
    );
}

#[test]
fn test_update_only_mutates_target() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "messages.en.xlf", MESSAGES);

    let outcome = sync_unit(&path, "home.title", "Welcome back", &NoopNotifier).unwrap();
    assert_eq!(outcome, SyncOutcome::Updated);

    let expected = MESSAGES.replace(
        "<target>Welcome</target>",
        "<target>Welcome back</target>",
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_update_replaces_cdata_target() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "messages.en.xlf", MESSAGES);

    sync_unit(&path, "home.bye", "See <you>", &NoopNotifier).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("<target>See &lt;you&gt;</target>"));
    let bye = triples(&path)
        .into_iter()
        .find(|(id, _, _)| id == "home.bye")
        .unwrap();
    assert_eq!(bye.2.as_deref(), Some("See <you>"));
}

#[test]
fn test_grouped_units_are_not_matched() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "messages.en.xlf", MESSAGES);

    let outcome = sync_unit(&path, "footer.copy", "(c) ACME", &NoopNotifier).unwrap();
    assert_eq!(outcome, SyncOutcome::Inserted);
    assert!(fs::read_to_string(&path).unwrap().contains("<target>&#169; ACME</target>"));
}

#[test]
fn test_round_trip_keeps_triples() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "messages.en.xlf", MESSAGES);

    sync_unit(&path, "a.one", "One & only", &NoopNotifier).unwrap();
    sync_unit(&path, "a.two", "\"Two\"", &NoopNotifier).unwrap();
    sync_unit(&path, "home.title", "Hi", &NoopNotifier).unwrap();
    let before = triples(&path);

    let document = XliffDocument::read_from(&path).unwrap();
    let reparsed = XliffDocument::from_bytes(&document.to_bytes().unwrap()).unwrap();
    let after: Vec<_> = reparsed
        .units()
        .unwrap()
        .into_iter()
        .map(|u| (u.id, u.source, u.target))
        .collect();

    assert_eq!(before, after);
    assert_eq!(
        after.last().unwrap(),
        &(
            "a.two".to_string(),
            Some("a.two".to_string()),
            Some("\"Two\"".to_string())
        )
    );
}

#[test]
fn test_notifier_called_once_after_write() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "messages.en.xlf", MESSAGES);

    let calls = RefCell::new(Vec::new());
    let notifier = |changed: &Path| calls.borrow_mut().push(changed.to_path_buf());

    sync_unit(&path, "x.y", "z", &notifier).unwrap();
    assert_eq!(calls.borrow().as_slice(), [path.clone()]);
}

#[test]
fn test_notifier_not_called_on_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "broken.xlf", "<xliff>");

    let calls = RefCell::new(0usize);
    let notifier = |_: &Path| *calls.borrow_mut() += 1;

    assert!(sync_unit(&path, "x.y", "z", &notifier).is_err());
    assert_eq!(*calls.borrow(), 0);
}
