//! End-to-end checks of the cleaning pipeline through the public API.

use std::io::Write;

use pretty_assertions::assert_eq;
use securedata::batch::{self, BatchFormat, BatchJob};
use securedata::dictionary::DictionaryWarning;
use securedata::{PiiRedactor, Pipeline, SentinelStyle, SlangDictionary};
use serde_json::json;

fn redactor() -> PiiRedactor {
    PiiRedactor::new(SentinelStyle::Plain).unwrap()
}

fn pipeline_with(pairs: &[(&str, &str)]) -> Pipeline {
    let dict = SlangDictionary::from_pairs(pairs.iter().copied());
    Pipeline::new(dict, SentinelStyle::Plain).unwrap()
}

#[test]
fn redact_leaves_pii_free_text_alone() {
    let r = redactor();
    for text in [
        "Aplikasi error trus nih, kecewa bgt.",
        "Topup Rp 50.000 jam segini lancar jaya, mantap min.",
        "No tiket keluhan sy 48213.",
        "Woi balikin duit gw 500rb!! jgn diem aja min.",
    ] {
        assert_eq!(r.redact(text), text);
    }
}

#[test]
fn redact_is_idempotent() {
    let r = redactor();
    for text in [
        "Sy lupa pin, tlg reset ke email siti.cantik123@yahoo.com atau wa ke 0813 4455 6677. Urgent!!",
        "Tolong hapus akun saya dengan nik 3201123456780005, saya mau ganti nomor baru.",
        "Hati2 guys, kmrn saya di tlp no +62818000999 ngaku dr CS",
    ] {
        let once = r.redact(text);
        assert_eq!(r.redact(&once), once);
    }
}

#[test]
fn email_replaced_without_touching_context() {
    let r = redactor();
    assert_eq!(
        r.redact("Balikin duit gue! Email gw user.disappointed@outlook.com makasih"),
        "Balikin duit gue! Email gw [EMAIL_SENSOR] makasih"
    );
}

#[test]
fn phone_shapes_and_short_numbers() {
    let r = redactor();
    assert_eq!(r.redact("08123456789"), "[HP_SENSOR]");
    assert_eq!(r.redact("+62 812-3456-789"), "[HP_SENSOR]");
    assert_eq!(r.redact("62812345678"), "[HP_SENSOR]");
    assert_eq!(r.redact("1234567"), "1234567");
}

#[test]
fn phone_touching_a_word_never_reaches_clean_text() {
    let p = pipeline_with(&[("tlp", "telepon")]);
    assert_eq!(p.clean("Hp08123456789 ya"), "hp[HP_SENSOR] ya");
    assert_eq!(p.clean("tlp0812-3456-7890!!"), "tlp[HP_SENSOR]");
}

#[test]
fn sixteen_digit_run_is_nik() {
    let r = redactor();
    assert_eq!(r.redact("nik 3171234567890001"), "nik [NIK_SENSOR]");
    assert_eq!(r.redact("nik 0812345678901234"), "nik [NIK_SENSOR]");
}

#[test]
fn normalize_replaces_known_tokens() {
    let dict = SlangDictionary::from_pairs([("blm", "belum"), ("udh", "sudah"), ("trf", "transfer")]);
    assert_eq!(
        securedata::pipeline::normalize("blm udh trf", &dict),
        "belum sudah transfer"
    );
}

#[test]
fn non_string_inputs_clean_to_empty() {
    let p = pipeline_with(&[]);
    assert_eq!(p.clean_value(None), "");
    assert_eq!(p.clean_json(&json!(null)), "");
    assert_eq!(p.clean_json(&json!(42)), "");
}

#[test]
fn clean_admin_complaint() {
    let p = pipeline_with(&[("blm", "belum"), ("min", "admin")]);
    assert_eq!(
        p.clean("  Min, saldo   saya   BLM masuk"),
        "admin saldo saya belum masuk"
    );
}

#[test]
fn duplicate_dictionary_key_keeps_last() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "gk : gak").unwrap();
    writeln!(file, "gk : tidak").unwrap();

    let report = SlangDictionary::load(file.path()).unwrap();
    assert_eq!(report.dictionary.get("gk"), Some("tidak"));
}

#[test]
fn missing_dictionary_still_redacts_and_sanitizes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("combined_slang_words.txt");

    let report = SlangDictionary::load(&path).unwrap();
    assert!(report.dictionary.is_empty());
    assert!(matches!(report.warning, Some(DictionaryWarning::MissingResource { .. })));

    let p = Pipeline::new(report.dictionary, SentinelStyle::Plain).unwrap();
    assert_eq!(
        p.clean("Admin tlg respon DM, sy udh kirim ke a.b@c.id. Thx."),
        "admin tlg respon dm sy udh kirim ke [EMAIL_SENSOR] thx"
    );
}

#[test]
fn bundled_dictionary_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/slangword/combined_slang_words.txt");
    let report = SlangDictionary::load(path).unwrap();
    assert!(report.warning.is_none());
    assert_eq!(report.dictionary.get("min"), Some("admin"));
    assert_eq!(report.dictionary.get("woy"), Some(""));

    let p = Pipeline::new(report.dictionary, SentinelStyle::Plain).unwrap();
    assert_eq!(
        p.clean("Woi balikin duit gw 500rb!! jgn diem aja min."),
        "kembalikan duit saya 500rb jangan diam aja admin"
    );
}

#[test]
fn batch_marks_only_the_email_row() {
    let p = pipeline_with(&[("tlg", "tolong")]);
    let input = "raw_text\nTlg cek\nemail saya budi@mail.com\nMantap min\nsaldo kepotong\n";

    let mut out = Vec::new();
    let summary = batch::run(&p, &BatchJob::new(BatchFormat::Csv), input.as_bytes(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    let mut rdr = csv::Reader::from_reader(out.as_bytes());
    let cleaned: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap().get(1).unwrap().to_string())
        .collect();

    assert_eq!(summary.rows, 4);
    assert_eq!(cleaned.len(), 4);
    assert_eq!(summary.redacted_rows, 1);
    let with_email: Vec<usize> = cleaned
        .iter()
        .enumerate()
        .filter(|(_, c)| c.contains("[EMAIL_SENSOR]"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(with_email, vec![1]);
    assert_eq!(cleaned[0], "tolong cek");
}
