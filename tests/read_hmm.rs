use std::fs;
use std::io::Write;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;

use hmm_hits::types::{ColumnType, HitRecord, Strand, COLUMNS};
use hmm_hits::{read_hits, read_hits_batch, HitError, HitTable, NamingMode};

const REP_NAME: &str = "acba.007.p01.13";

fn data(parts: &[&str]) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data");
    for p in parts {
        path.push(p);
    }
    path
}

fn inti_res() -> PathBuf {
    data(&[
        &format!("Results_Integron_Finder_{REP_NAME}"),
        "other",
        &format!("{REP_NAME}_intI.res"),
    ])
}

fn fictive(suffix: &str) -> PathBuf {
    data(&["fictive_results", &format!("{REP_NAME}_intI-{suffix}.res")])
}

fn expected(id_prot: &str) -> HitRecord {
    HitRecord {
        accession_number: REP_NAME.to_string(),
        query_name: "intI_Cterm".to_string(),
        id_query: "-".to_string(),
        id_prot: id_prot.to_string(),
        strand: Strand::Forward,
        pos_beg: 55,
        pos_end: 1014,
        evalue: 1.9e-25,
    }
}

fn read(path: &PathBuf, evalue: f64, coverage: f64) -> HitTable {
    read_hits(REP_NAME, path, evalue, coverage, NamingMode::Default).expect("read_hits failed")
}

#[test]
fn read_empty() {
    let table = read(&fictive("empty"), f64::INFINITY, 0.0);
    assert!(table.is_empty());
    let schema: Vec<(&str, ColumnType)> = table.schema().iter().map(|c| (c.name, c.kind)).collect();
    assert_eq!(
        schema,
        vec![
            ("Accession_number", ColumnType::Str),
            ("query_name", ColumnType::Str),
            ("ID_query", ColumnType::Str),
            ("ID_prot", ColumnType::Str),
            ("strand", ColumnType::Int),
            ("pos_beg", ColumnType::Int),
            ("pos_end", ColumnType::Int),
            ("evalue", ColumnType::Float),
        ]
    );
    assert_eq!(table.schema(), &COLUMNS[..]);
}

#[test]
fn read_missing_file_is_empty() {
    let table = read(&fictive("does-not-exist"), f64::INFINITY, 0.0);
    assert_eq!(table, HitTable::default());
}

#[test]
fn read_hmm() {
    let table = read(&inti_res(), f64::INFINITY, 0.0);
    assert_eq!(table.rows, vec![expected("ACBA.007.P01_13_1")]);
}

#[test]
fn read_hmm_gembase() {
    let table = read_hits(REP_NAME, fictive("gembase"), f64::INFINITY, 0.0, NamingMode::Gembase)
        .unwrap();
    assert_eq!(table.rows, vec![expected("ACBA007p01a_000009")]);
}

#[test]
fn gembase_changes_only_the_protein_id() {
    let path = fictive("gembase");
    let plain = read(&path, f64::INFINITY, 0.0);
    let gembase = read_hits(REP_NAME, &path, f64::INFINITY, 0.0, NamingMode::Gembase).unwrap();
    let (a, b) = (&plain.rows[0], &gembase.rows[0]);
    assert_eq!(a.id_prot, "ACBA007p01a_9");
    assert_ne!(a.id_prot, b.id_prot);
    assert_eq!((a.strand, a.pos_beg, a.pos_end, a.evalue), (b.strand, b.pos_beg, b.pos_end, b.evalue));
}

#[test]
fn gembase_mode_rejects_prodigal_names() {
    let err = read_hits(REP_NAME, inti_res(), f64::INFINITY, 0.0, NamingMode::Gembase).unwrap_err();
    match err {
        HitError::Parse { path, line, message } => {
            assert_eq!(path, inti_res());
            assert_eq!(line, 4);
            assert!(message.contains("ACBA.007.P01_13_1"), "{message}");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn read_hmm_evalue() {
    let table = read(&inti_res(), 1.95e-25, 0.0);
    assert_eq!(table.rows, vec![expected("ACBA.007.P01_13_1")]);

    let table = read(&inti_res(), 1.9e-25, 0.0);
    assert!(table.is_empty());
}

#[test]
fn read_hmm_cov() {
    let table = read(&inti_res(), f64::INFINITY, 0.945);
    assert_eq!(table.rows, vec![expected("ACBA.007.P01_13_1")]);

    let table = read(&inti_res(), f64::INFINITY, 0.95);
    assert!(table.is_empty());
}

#[test]
fn read_hmm_keeps_best_evalue_per_protein() {
    let table = read(&fictive("multi"), f64::INFINITY, 0.0);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0], expected("ACBA.007.P01_13_1"));
    assert_eq!(table.rows[1].id_prot, "ACBA.007.P01_13_20");
    assert_eq!(table.rows[1].strand, Strand::Reverse);
    assert_eq!(table.rows[1].evalue, 4.0e-18);
}

#[test]
fn read_hmm_order_follows_first_accepted_hit() {
    // The phage_integrase hit fails the threshold, so ACBA.007.P01_13_1 is first seen on line 6.
    let table = read(&fictive("multi"), 1e-15, 0.0);
    let prots: Vec<&str> = table.rows.iter().map(|r| r.id_prot.as_str()).collect();
    assert_eq!(prots, ["ACBA.007.P01_13_20", "ACBA.007.P01_13_1"]);
    assert_eq!(table.rows[1], expected("ACBA.007.P01_13_1"));
}

#[test]
fn malformed_line_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.res");
    let good = fs::read_to_string(inti_res()).unwrap();
    let broken = good.replace("1.9e-25", "n/a");
    fs::write(&path, broken).unwrap();

    let err = read_hits(REP_NAME, &path, f64::INFINITY, 0.0, NamingMode::Default).unwrap_err();
    assert!(matches!(err, HitError::Parse { line: 4, .. }), "{err}");
    assert!(err.to_string().starts_with(&format!("{}:4:", path.display())));
}

#[test]
fn non_finite_or_negative_evalue_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let good = fs::read_to_string(inti_res()).unwrap();
    for bad in ["nan", "NaN", "inf", "-1e-5"] {
        let path = dir.path().join(format!("{bad}.res"));
        fs::write(&path, good.replace("1.9e-25", bad)).unwrap();

        let err = read_hits(REP_NAME, &path, f64::INFINITY, 0.0, NamingMode::Default).unwrap_err();
        match err {
            HitError::Parse { line, message, .. } => {
                assert_eq!(line, 4);
                assert!(message.contains("is not a valid e-value"), "{message}");
            }
            other => panic!("{bad}: expected a parse error, got {other:?}"),
        }
    }
}

#[test]
fn truncated_line_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.res");
    fs::write(&path, "ACBA.007.P01_13_1 - 337 intI_Cterm - 200 1.9e-25 89.1\n").unwrap();

    let err = read_hits(REP_NAME, &path, f64::INFINITY, 0.0, NamingMode::Default).unwrap_err();
    assert!(matches!(err, HitError::Parse { line: 1, .. }), "{err}");
}

#[test]
fn reads_gzipped_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{REP_NAME}_intI.res.gz"));
    let mut enc = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    enc.write_all(&fs::read(inti_res()).unwrap()).unwrap();
    enc.finish().unwrap();

    let table = read(&path, f64::INFINITY, 0.0);
    assert_eq!(table, read(&inti_res(), f64::INFINITY, 0.0));
}

#[test]
fn batch_results_follow_job_order() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.res");
    fs::write(&broken, "not a domain table line\n").unwrap();

    let jobs = vec![
        (REP_NAME.to_string(), fictive("multi")),
        ("broken".to_string(), broken),
        (REP_NAME.to_string(), fictive("empty")),
        (REP_NAME.to_string(), inti_res()),
    ];
    let results = read_hits_batch(&jobs, f64::INFINITY, 0.0, NamingMode::Default);
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().len(), 2);
    assert!(matches!(results[1], Err(HitError::Parse { .. })));
    assert!(results[2].as_ref().unwrap().is_empty());
    assert_eq!(results[3].as_ref().unwrap().rows, vec![expected("ACBA.007.P01_13_1")]);
}

#[test]
fn tsv_output() {
    let table = read(&inti_res(), f64::INFINITY, 0.0);
    assert_eq!(
        table.to_tsv(),
        "Accession_number\tquery_name\tID_query\tID_prot\tstrand\tpos_beg\tpos_end\tevalue\n\
         acba.007.p01.13\tintI_Cterm\t-\tACBA.007.P01_13_1\t1\t55\t1014\t1.9e-25\n"
    );
}
