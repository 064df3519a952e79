//! Integration test: emissivity tables survive a trip through a parquet
//! table-set directory unchanged, fingerprint included.

use ndarray::Array1;

use dust_emissivities::numeric::logspace;
use dust_emissivities::{Emissivities, EmissivityError, TableSet, TabulatedOpacity};

fn lte_table() -> Emissivities {
    let nu = logspace(9.0, 17.0, 81);
    let kappa = nu.mapv(|n| (n / 1e12).powf(1.8).min(1e4));
    let opacity = TabulatedOpacity::new(nu, kappa).expect("valid opacity");
    let mut e = Emissivities::new();
    e.set_lte(&opacity, 12, 5.0, 2000.0).expect("LTE solve should succeed");
    e
}

#[test]
fn test_parquet_round_trip_is_bit_exact() {
    let dir = tempfile::tempdir().unwrap();
    let original = lte_table();

    let mut set = TableSet::new();
    original.to_table_set(&mut set).unwrap();
    set.write_dir(dir.path()).unwrap();

    let loaded_set = TableSet::read_dir(dir.path()).unwrap();
    assert_eq!(loaded_set.keyword("emissvar"), Some("E"));
    assert_eq!(loaded_set.keyword("lte"), Some("yes"));

    let loaded = Emissivities::from_table_set(&loaded_set).unwrap();
    assert_eq!(loaded, original);
    assert_eq!(loaded.hash().unwrap(), original.hash().unwrap());
}

#[test]
fn test_hand_built_non_lte_table_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut e = Emissivities::new();
    e.set_var_name(Some("specific_energy".parse().unwrap()));
    e.set_nu(vec![1e12, 2e12]).unwrap();
    e.set_var(Array1::from_vec(vec![3.0])).unwrap();
    e.set_jnu(vec![vec![0.25], vec![0.0]]).unwrap();

    let mut set = TableSet::new();
    e.to_table_set(&mut set).unwrap();
    set.write_dir(dir.path()).unwrap();

    let loaded = Emissivities::from_table_set(&TableSet::read_dir(dir.path()).unwrap()).unwrap();
    assert!(!loaded.is_lte());
    assert_eq!(loaded, e);
}

#[test]
fn test_hash_distinguishes_normalized_table() {
    let table = lte_table();
    let mut normalized = table.clone();
    normalized.normalize().unwrap();
    assert_ne!(table.hash().unwrap(), normalized.hash().unwrap());
}

#[test]
fn test_empty_table_cannot_be_stored_or_hashed() {
    let e = Emissivities::new();
    let mut set = TableSet::new();
    assert_eq!(e.to_table_set(&mut set), Err(EmissivityError::IncompleteTable));
    assert_eq!(e.hash(), Err(EmissivityError::IncompleteTable));
}
