use csgo_cfg::{
    insensitive_load, load, load_sources, loose_load, Access, Continuation, Error, File,
    LoadOptions, Source, DEFAULT_SECTION,
};
use std::io::Write;
use tempfile::NamedTempFile;

const CONF_DATA: &str = "
cash_team_elimination_hostage_map_ct 2000
cash_team_elimination_hostage_map_t 1000
cash_team_win_by_time_running_out_bomb 3250
cash_team_win_by_time_running_out_hostage 3250
ff_damage_reduction_grenade 0.85            // How much to reduce damage done to teammates by a thrown grenade.  Range is from 0 - 1 (with 1 being damage equal to what is done to an enemy)
ff_damage_reduction_bullets 0.33            // How much to reduce damage done to teammates when shot.  Range is from 0 - 1 (with 1 being damage equal to what is done to an enemy)
ff_damage_reduction_other 0.4               // How much to reduce damage done to teammates by things other than bullets and grenades.  Range is from 0 - 1 (with 1 being damage equal to what is done to an enemy)
ff_damage_reduction_grenade_self 1          // How much to damage a player does to himself with his own grenade.  Range is from 0 - 1 (with 1 being damage equal to what is done to an enemy)
mp_afterroundmoney 0                // amount of money awared to every player after each round
mp_autokick 0                   // Kick idle/team-killing players
mp_autoteambalance 0
";

const PACKAGE_CONF: &str = "\
NAME cfg
IMPORT_PATH gopkg.in/%(NAME)s.v1

// Information about package author
[author]
NAME Unknwon
E-MAIL fake@localhost
GITHUB https://github.com/%(NAME)s

[package]
CLONE_URL https://%(IMPORT_PATH)s

[package.sub]
UNUSED_KEY \"should be deleted\"

[features]
- Support read/write comments of keys and sections
- Support auto-increment of key names
- Support load multiple files to overwrite key values

[types]
STRING str
BOOL true
FLOAT64 1.25
INT 10
TIME 2015-01-01T20:17:05Z
DURATION 2h45m
UINT 3

[array]
STRINGS en, zh, de
FLOAT64S 1.1, 2.2, 3.3
INTS 1, 2, 3
TIMES 2015-01-01T20:17:05Z,2015-01-01T20:17:05Z,2015-01-01T20:17:05Z

[note]
empty_lines \"next line is empty\"
";

fn temp_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_empty() {
    let cfg = load("").unwrap();
    assert_eq!(cfg.section_strings(), vec![DEFAULT_SECTION]);
    assert!(cfg.section("").unwrap().is_empty());
}

#[test]
fn test_load_game_config() {
    let cfg = load(CONF_DATA).unwrap();
    let default = cfg.get_section("").unwrap();
    assert_eq!(default.len(), 11);

    let bullets = default.get_key("ff_damage_reduction_bullets").unwrap();
    assert_eq!(bullets.f64().unwrap(), 0.33);
    assert!(bullets.comment.starts_with("How much to reduce damage done to teammates when shot."));

    let kick = default.get_key("mp_autokick").unwrap();
    assert!(!kick.bool().unwrap());
    assert_eq!(kick.comment, "Kick idle/team-killing players");

    assert_eq!(
        cfg.get_key("", "cash_team_win_by_time_running_out_bomb")
            .unwrap()
            .int()
            .unwrap(),
        3250
    );
}

#[test]
fn test_load_multiple_sources() {
    let conf = temp_config(PACKAGE_CONF);
    let cfg = load_sources(
        LoadOptions::default(),
        [Source::from(CONF_DATA), Source::path(conf.path())],
    )
    .unwrap();
    assert!(cfg.has_section("author"));
    assert!(cfg.key("", "mp_autokick").is_some());
    assert_eq!(cfg.key("", "NAME").unwrap().value(), "cfg");

    let err = load_sources(
        LoadOptions::default(),
        [Source::from(CONF_DATA), Source::path("testdata/404.cfg")],
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingSource(_)));
}

#[test]
fn test_bad_sources() {
    assert!(load(Source::path("testdata/404.cfg")).is_err());
    assert!(matches!(load("[]"), Err(Error::MalformedSectionHeader { .. })));
    assert!(matches!(load("["), Err(Error::MalformedSectionHeader { .. })));
    assert!(load("\"\"\"name").is_err());
    assert!(load("\"\"\"name\"\"\"").is_err());
    assert!(load("\"\"=1").is_err());
    assert!(load("=").is_err());
    assert!(load("name").is_err());
    assert!(matches!(
        load("name=\"\"\"Unknwon"),
        Err(Error::UnterminatedQuotedValue { .. })
    ));
}

#[test]
fn test_parse_errors_carry_line_numbers() {
    let err = load("a 1\nb 2\n[]\n").unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(
        err,
        Error::MalformedSectionHeader {
            line: 3,
            text: "[]".to_string(),
        }
    );
}

#[test]
fn test_reader_source() {
    let reader = std::io::Cursor::new(b"\xEF\xBB\xBFsv_cheats 1\n".to_vec());
    let cfg = load(Source::reader(reader)).unwrap();
    assert_eq!(cfg.key("", "sv_cheats").unwrap().value(), "1");
}

#[test]
fn test_invalid_utf8_source() {
    let reader = std::io::Cursor::new(b"hostname caf\xE9\n".to_vec());
    assert!(matches!(
        load(Source::reader(reader)),
        Err(Error::SourceRead { .. })
    ));
}

#[test]
fn test_package_document() {
    let cfg = load(PACKAGE_CONF).unwrap();

    let author = cfg.get_section("author").unwrap();
    assert_eq!(author.comment, "Information about package author");
    assert_eq!(author.get_key("E-MAIL").unwrap().value(), "fake@localhost");

    assert_eq!(
        cfg.get_key("package.sub", "CLONE_URL").unwrap().value(),
        "https://%(IMPORT_PATH)s"
    );
    assert_eq!(cfg.section("package.sub").unwrap().parent_name(), Some("package"));

    let features = cfg.get_section("features").unwrap();
    assert_eq!(features.key_strings(), vec!["#1", "#2", "#3"]);
    assert_eq!(features.get_key("#2").unwrap().value(), "Support");

    let types = cfg.get_section("types").unwrap();
    assert_eq!(types.get_key("INT").unwrap().int().unwrap(), 10);
    assert_eq!(types.get_key("UINT").unwrap().u64().unwrap(), 3);
    assert_eq!(
        types.get_key("DURATION").unwrap().duration().unwrap(),
        std::time::Duration::from_secs(2 * 3600 + 45 * 60)
    );
    assert_eq!(
        types.get_key("TIME").unwrap().time().unwrap().to_rfc3339(),
        "2015-01-01T20:17:05+00:00"
    );

    let array = cfg.get_section("array").unwrap();
    assert_eq!(array.get_key("STRINGS").unwrap().value(), "en,");
    assert_eq!(cfg.get_key("note", "empty_lines").unwrap().value(), "next line is empty");
}

#[test]
fn test_quoted_lists() {
    let cfg = load("STRINGS \"en, zh, de\"\nINTS 1,2,3\n").unwrap();
    assert_eq!(
        cfg.get_key("", "STRINGS").unwrap().strings(','),
        vec!["en", "zh", "de"]
    );
    assert_eq!(cfg.get_key("", "INTS").unwrap().ints(',').unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_loose_load() {
    let cfg = loose_load([Source::path("testdata/404.cfg")]).unwrap();
    assert!(cfg.section("").unwrap().is_empty());

    let cfg = loose_load([Source::from("name Unknwon"), Source::path("testdata/404.cfg")]).unwrap();
    assert_eq!(cfg.key("", "name").unwrap().value(), "Unknwon");

    // Other failures stay fatal.
    assert!(loose_load([Source::from("[]")]).is_err());
}

#[test]
fn test_insensitive_load() {
    let conf = temp_config(PACKAGE_CONF);
    let cfg = insensitive_load([Source::from(CONF_DATA), Source::path(conf.path())]).unwrap();
    assert_eq!(cfg.get_key("AUTHOR", "name").unwrap().value(), "Unknwon");
    assert_eq!(cfg.get_key("Author", "E-Mail").unwrap().value(), "fake@localhost");
    assert!(cfg.has_section("package.SUB"));
}

#[test]
fn test_continuation_lines() {
    let text = "key1 a\\b\\ \nkey2 c\\d\\";
    let cfg = load_sources(LoadOptions::new().ignore_continuation(), [text]).unwrap();
    assert_eq!(cfg.key("", "key1").unwrap().value(), "a\\b\\");
    assert_eq!(cfg.key("", "key2").unwrap().value(), "c\\d\\");

    let joined = load_sources(
        LoadOptions::new().with_continuation(Continuation::Join),
        ["hostname first\\\n   second\nnext 1\n"],
    )
    .unwrap();
    assert_eq!(joined.key("", "hostname").unwrap().value(), "firstsecond");
    assert_eq!(joined.key("", "next").unwrap().value(), "1");
}

#[test]
fn test_append() {
    let mut cfg = load("").unwrap();
    cfg.append(["", ""]).unwrap();
    cfg.append(["a 1", "[s]\nb 2"]).unwrap();
    assert_eq!(cfg.key("s", "b").unwrap().value(), "2");

    // A failing append leaves the document untouched.
    assert!(cfg.append(["c 3", "[]"]).is_err());
    assert!(cfg.key("", "c").is_none());
}

#[test]
fn test_later_sources_overwrite_values() {
    let cfg = load_sources(
        LoadOptions::default(),
        ["NAME first\n[author]\nNAME a", "NAME second\n[author]\nE-MAIL x"],
    )
    .unwrap();
    assert_eq!(cfg.key("", "NAME").unwrap().value(), "second");
    assert_eq!(cfg.key("author", "NAME").unwrap().value(), "a");
    assert_eq!(cfg.key("author", "E-MAIL").unwrap().value(), "x");
}

#[test]
fn test_write_empty() {
    let mut buf = Vec::new();
    csgo_cfg::empty().write_to(&mut buf).unwrap();
    assert!(buf.is_empty());
}

#[test]
fn test_save_and_reload() {
    let mut cfg = load_sources(LoadOptions::default(), [CONF_DATA, PACKAGE_CONF]).unwrap();
    cfg.section_mut("").key_mut("NAME").unwrap().comment = "Package name".to_string();
    cfg.section_mut("author").comment =
        "Information about package author\nBio can be written in multiple lines.".to_string();
    cfg.section_mut("advanced")
        .new_key("val w/ pound", "my#password")
        .unwrap();
    cfg.section_mut("advanced")
        .new_key("longest key has a colon : yes/no", "yes")
        .unwrap();

    let out = NamedTempFile::new().unwrap();
    cfg.save_to(out.path()).unwrap();
    let text = std::fs::read_to_string(out.path()).unwrap();
    assert!(text.contains("NAME                                      cfg // Package name\n"));
    assert!(text.contains(
        "// Information about package author\n// Bio can be written in multiple lines.\n[author]\n"
    ));
    assert!(text.contains("\"val w/ pound\"                     my#password\n"));

    let reloaded = load(Source::path(out.path())).unwrap();
    assert_eq!(reloaded.section_strings(), cfg.section_strings());
    for section in cfg.sections() {
        let again = reloaded.get_section(section.name()).unwrap();
        assert_eq!(again.keys_hash(), section.keys_hash(), "section {}", section.name());
    }
    assert_eq!(
        reloaded.get_key("features", "#1").unwrap().value(),
        cfg.get_key("features", "#1").unwrap().value()
    );
}

#[test]
fn test_hash_prefixed_key_survives_writing() {
    let cfg = load("#foo 1\n- bar\n").unwrap();
    assert!(!cfg.get_key("", "#foo").unwrap().is_anonymous());
    let text = cfg.to_string();
    assert_eq!(text, "#foo 1\n-    bar\n");

    let reloaded = load(text.as_str()).unwrap();
    assert_eq!(reloaded.get_key("", "#foo").unwrap().value(), "1");
    assert_eq!(reloaded.get_key("", "#1").unwrap().value(), "bar");
    assert_eq!(reloaded.section("").unwrap().len(), 2);
}

#[test]
fn test_save_refuses_unwritable_values() {
    let mut cfg = load("motd hello\n").unwrap();
    cfg.section_mut("").new_key("motd", "say \"hi").unwrap();

    let out = NamedTempFile::new().unwrap();
    std::fs::write(out.path(), "motd hello\n").unwrap();
    let err = cfg.save_to(out.path()).unwrap_err();
    assert!(matches!(err, Error::Unwritable { .. }));
    assert_eq!(std::fs::read_to_string(out.path()).unwrap(), "motd hello\n");

    let mut buf = Vec::new();
    assert!(cfg.write_to(&mut buf).is_err());
    assert!(buf.is_empty());
}

#[test]
fn test_edit_document() {
    let mut cfg = load(PACKAGE_CONF).unwrap();
    assert!(cfg.section_mut("package.sub").delete_key("UNUSED_KEY").is_some());
    assert!(!cfg.section("package.sub").unwrap().has_key("UNUSED_KEY"));

    cfg.new_sections(&["maps", "bots"]).unwrap();
    cfg.section_mut("bots").new_key("bot_quota", "10").unwrap();
    assert!(cfg.delete_section("note").is_some());
    assert!(!cfg.has_section("note"));
    assert!(cfg.section_strings().ends_with(&["maps".to_string(), "bots".to_string()]));
}

#[test]
fn test_shared_document() {
    let shared = load(CONF_DATA).unwrap().into_shared();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                let value = shared.read().key("", "mp_autokick").unwrap().value().to_string();
                shared
                    .write()
                    .section_mut("players")
                    .new_key(&format!("player{i}"), &value)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(shared.read().get_section("players").unwrap().len(), 4);

    let mut file: File = shared.into_inner().unwrap();
    file.write().section_mut("").new_key("sv_cheats", "0").unwrap();
    assert_eq!(Access::read(&file).key("", "sv_cheats").unwrap().value(), "0");
}
