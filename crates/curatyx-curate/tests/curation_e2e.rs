//! End-to-end curation against reference tables stored on disk.
//!
//! Run with:
//! ```bash
//! cargo test --package curatyx-curate --test curation_e2e -- --nocapture
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use curatyx_common::{Config, EntityKind, Table, Value};
use curatyx_curate::{Entity, Gene, Protein};
use curatyx_reference::{ReferenceKey, ReferenceProvider, TsvProvider};
use pretty_assertions::assert_eq;

const GENE_TSV: &str = "\
ensembl_gene_id\tsymbol\tHGNC\tsynonyms
ENSG1\tTP53\tHGNC:11998\tp53|LFS1
ENSG2\tBRCA1\tHGNC:1100\tRNF53
\tORPHAN\t\tnothing
";

const PROTEIN_TSV: &str = "\
uniprot_id\tsynonyms
P04637\tP53_HUMAN
";

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_tsv(provider: &TsvProvider, key: &ReferenceKey, content: &str) {
    let path = provider.path_for(key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup(dir: &Path) -> (Config, Arc<TsvProvider>) {
    let mut config = Config::default();
    config.reference.data_dir = dir.to_path_buf();

    let provider = TsvProvider::from_config(&config.reference);
    write_tsv(&provider, &ReferenceKey::new(EntityKind::Gene, "human", "ensembl"), GENE_TSV);
    write_tsv(&provider, &ReferenceKey::new(EntityKind::Protein, "human", "uniprot"), PROTEIN_TSV);
    (config, Arc::new(provider))
}

fn flags(table: &Table) -> Vec<Value> {
    table.column("curated").unwrap().to_vec()
}

#[test]
fn test_gene_symbols_from_disk() -> anyhow::Result<()> {
    init_logging();
    let dir = tempfile::tempdir()?;
    let (config, provider) = setup(dir.path());
    let gene = Gene::from_config(provider, &config)?;

    let input = Table::with_range_index(4).with_column(
        "symbol",
        vec!["TP53".into(), "RNF53".into(), "UNKNOWN".into(), Value::Null],
    )?;
    let curated = gene.curate(&input, Some("symbol"), None)?;
    assert_eq!(
        curated.index(),
        &[Some("ENSG1".to_string()), Some("ENSG2".to_string()), Some("UNKNOWN".to_string()), None]
    );
    assert_eq!(
        flags(&curated),
        vec![Value::Bool(true), Value::Bool(true), Value::Bool(false), Value::Bool(false)]
    );
    assert_eq!(
        curated.column("orig_index").unwrap(),
        &[Value::from("0"), Value::from("1"), Value::from("2"), Value::from("3")]
    );
    Ok(())
}

#[test]
fn test_synonym_scenario() -> anyhow::Result<()> {
    init_logging();
    let dir = tempfile::tempdir()?;
    let (config, provider) = setup(dir.path());
    let gene = Gene::from_config(provider, &config)?;

    // An index of synonyms, resolved through an explicit alias column.
    let input = Table::from_ids(["p53", "RNF53", "UNKNOWN"]);
    let curated = gene.curate(&input, None, Some("synonyms"))?;
    assert_eq!(
        curated.index(),
        &[Some("ENSG1".to_string()), Some("ENSG2".to_string()), Some("UNKNOWN".to_string())]
    );
    assert_eq!(flags(&curated), vec![Value::Bool(true), Value::Bool(true), Value::Bool(false)]);
    Ok(())
}

#[test]
fn test_orphan_rows_dropped_from_reference() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (config, provider) = setup(dir.path());
    let gene = Gene::from_config(provider, &config)?;

    let reference = gene.load_reference()?;
    assert_eq!(reference.n_rows(), 2);
    assert!(reference.has_column("hgnc_id"));

    // "nothing" belonged to the dropped row and resolves nowhere.
    let curated = gene.curate(&Table::from_ids(["nothing"]), None, Some("synonyms"))?;
    assert_eq!(flags(&curated), vec![Value::Bool(false)]);
    Ok(())
}

#[test]
fn test_reference_reloaded_after_invalidation() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (config, provider) = setup(dir.path());
    let gene = Gene::from_config(provider.clone(), &config)?;

    let input = Table::from_ids(["ENSG3"]);
    assert_eq!(flags(&gene.curate(&input, None, None)?), vec![Value::Bool(false)]);

    let key = ReferenceKey::new(EntityKind::Gene, "human", "ensembl");
    write_tsv(&provider, &key, &format!("{GENE_TSV}ENSG3\tKRAS\tHGNC:6407\tK-RAS\n"));

    // Still the cached table until invalidated.
    assert_eq!(flags(&gene.curate(&input, None, None)?), vec![Value::Bool(false)]);
    assert!(gene.invalidate_reference());
    assert_eq!(flags(&gene.curate(&input, None, None)?), vec![Value::Bool(true)]);
    Ok(())
}

#[test]
fn test_entities_share_one_contract() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let (config, provider) = setup(dir.path());
    let entities: Vec<Box<dyn Entity>> = vec![
        Box::new(Gene::from_config(provider.clone(), &config)?),
        Box::new(Protein::from_config(provider, &config)?),
    ];

    let input = Table::from_ids(["ENSG1", "P04637"]);
    let results: Vec<Vec<Value>> = entities
        .iter()
        .map(|entity| entity.curate(&input, None, None).map(|t| flags(&t)))
        .collect::<Result<_, _>>()?;

    assert_eq!(results[0], vec![Value::Bool(true), Value::Bool(false)]);
    assert_eq!(results[1], vec![Value::Bool(false), Value::Bool(true)]);
    Ok(())
}

#[test]
fn test_missing_reference_file() {
    let dir = tempfile::tempdir().unwrap();
    let provider = TsvProvider::new(dir.path());
    let key = ReferenceKey::new(EntityKind::Gene, "human", "ensembl");
    assert!(provider.get_reference_table(&key).is_err());

    let gene = Gene::new(Arc::new(provider)).unwrap();
    let err = gene.curate(&Table::from_ids(["ENSG1"]), None, None).unwrap_err();
    assert!(matches!(err, curatyx_common::CurateError::ReferenceUnavailable { .. }));
}
