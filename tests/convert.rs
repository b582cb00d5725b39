// SPDX-License-Identifier: MIT
use tbx2tsv::{convert_tbx_file, Error, LanguagePair, LINE_ENDING};

const TBX_BASIC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE martif SYSTEM "TBXBasiccoreStructV02.dtd">
<martif type="TBX-Basic" xml:lang="en-US" xmlns="urn:iso:std:iso:30042:ed-2">
  <martifHeader>
    <fileDesc><sourceDesc><p>Animals</p></sourceDesc></fileDesc>
  </martifHeader>
  <text>
    <body>
      <termEntry id="e1">
        <descrip type="subjectField">zoology</descrip>
        <langSet xml:lang="en">
          <tig><term>cat</term><termNote type="partOfSpeech">noun</termNote></tig>
        </langSet>
        <langSet xml:lang="es">
          <tig><term>gato</term></tig>
        </langSet>
      </termEntry>
      <termEntry id="e2">
        <langSet xml:lang="en"><tig><term>horse</term></tig></langSet>
        <langSet xml:lang="fr"><tig><term>cheval</term></tig></langSet>
      </termEntry>
      <termEntry id="e3">
        <langSet xml:lang="es"><tig><term>perro</term></tig></langSet>
        <langSet xml:lang="en"><tig><term>dog</term></tig></langSet>
        <langSet xml:lang="fr"><tig><term>chien</term></tig></langSet>
      </termEntry>
    </body>
  </text>
</martif>
"#;

fn lines(text: &[&str]) -> String {
    text.iter()
        .map(|line| format!("{}{}", line, LINE_ENDING))
        .collect()
}

#[test]
fn convert_en_es() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("animals.tbx");
    let output = dir.path().join("animals.tsv");
    std::fs::write(&input, TBX_BASIC).unwrap();

    let count = convert_tbx_file(&input, &output, &LanguagePair::default()).unwrap();
    assert_eq!(count, 2);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        lines(&["Source Term\tTarget Term", "cat\tgato", "dog\tperro"])
    );
}

#[test]
fn convert_without_namespace_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let ns_input = dir.path().join("ns.tbx");
    let bare_input = dir.path().join("bare.tbx");
    std::fs::write(&ns_input, TBX_BASIC).unwrap();
    std::fs::write(
        &bare_input,
        TBX_BASIC.replace(r#" xmlns="urn:iso:std:iso:30042:ed-2""#, ""),
    )
    .unwrap();

    let langs = LanguagePair::new("en", "fr");
    let ns_output = dir.path().join("ns.tsv");
    let bare_output = dir.path().join("bare.tsv");
    assert_eq!(convert_tbx_file(&ns_input, &ns_output, &langs).unwrap(), 2);
    assert_eq!(convert_tbx_file(&bare_input, &bare_output, &langs).unwrap(), 2);
    assert_eq!(
        std::fs::read(&ns_output).unwrap(),
        std::fs::read(&bare_output).unwrap()
    );
}

#[test]
fn no_matching_language_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("animals.tbx");
    let output = dir.path().join("animals.tsv");
    std::fs::write(&input, TBX_BASIC).unwrap();

    let count = convert_tbx_file(&input, &output, &LanguagePair::new("en", "de")).unwrap();
    assert_eq!(count, 0);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        lines(&["Source Term\tTarget Term"])
    );
}

#[test]
fn idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("animals.tbx");
    let output = dir.path().join("animals.tsv");
    std::fs::write(&input, TBX_BASIC).unwrap();

    let langs = LanguagePair::default();
    convert_tbx_file(&input, &output, &langs).unwrap();
    let first = std::fs::read(&output).unwrap();
    convert_tbx_file(&input, &output, &langs).unwrap();
    assert_eq!(first, std::fs::read(&output).unwrap());
}

#[test]
fn malformed_input_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.tbx");
    let output = dir.path().join("keep.tsv");
    std::fs::write(&input, &TBX_BASIC[..TBX_BASIC.len() / 2]).unwrap();
    std::fs::write(&output, "keep me\n").unwrap();

    let err = convert_tbx_file(&input, &output, &LanguagePair::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedXml { .. }), "{}", err);
    assert!(err.to_string().contains("line "));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me\n");
}

#[test]
fn missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.tsv");

    let err = convert_tbx_file(dir.path().join("missing.tbx"), &output, &LanguagePair::default())
        .unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));
    assert!(!output.exists());
}
