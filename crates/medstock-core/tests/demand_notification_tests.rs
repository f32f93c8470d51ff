//! Demand notification fan-out tests.

use std::io::Write;

use medstock_core::db::Database;
use medstock_core::geo::{GeoPoint, EARTH_RADIUS_KM};
use medstock_core::models::{Medicine, Pharmacy};
use medstock_core::{
    open_database_in_memory, open_database_with_config, FfiNewMedicine, FfiNewPharmacy,
    MedStockCore, MedStockError, Notifier,
};

fn lon_for_km(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).to_degrees()
}

fn add_medicine(core: &MedStockCore, name: &str) -> String {
    core.add_medicine(FfiNewMedicine {
        name: name.to_string(),
        generic_name: None,
        strength: None,
        form: Some("syrup".to_string()),
        price: 80.0,
        manufacture_date: None,
        expiry_date: None,
    })
    .unwrap()
    .id
}

fn add_pharmacy(core: &MedStockCore, name: &str, km_east: f64) -> (String, String) {
    let p = core
        .add_pharmacy(FfiNewPharmacy {
            name: name.to_string(),
            address: format!("{} Market", name),
            latitude: 0.0,
            longitude: lon_for_km(km_east),
            phone: Some("+91 00000 00000".to_string()),
            email: format!("{}@pharmacy.test", name),
            registration_id: None,
        })
        .unwrap();
    (p.id, p.email)
}

#[test]
fn test_three_in_range_two_outside() {
    let core = open_database_in_memory().unwrap();
    let med_id = add_medicine(&core, "Benadryl");

    let in_range: Vec<_> = [("a", 0.5), ("b", 10.0), ("c", 19.5)]
        .into_iter()
        .map(|(n, km)| add_pharmacy(&core, n, km))
        .collect();
    let out_of_range: Vec<_> = [("d", 20.5), ("e", 80.0)]
        .into_iter()
        .map(|(n, km)| add_pharmacy(&core, n, km))
        .collect();

    // One in-range pharmacy already stocks it, one is out, one never reported
    core.update_stock(in_range[0].1.clone(), med_id.clone(), 12)
        .unwrap();
    core.update_stock(in_range[1].1.clone(), med_id.clone(), 0)
        .unwrap();

    let notice = core.notify_demand("benadryl".into(), 0.0, 0.0).unwrap();
    assert_eq!(notice.notified_count, 3);
    assert!(!notice.message.is_empty());

    for (id, _) in &in_range {
        let notes = core.notifications_for_pharmacy(id.clone()).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].medicine_id, med_id);
        assert!(notes[0].message.contains("Benadryl"));
        assert!(!notes[0].read);
    }
    for (id, _) in &out_of_range {
        assert!(core.notifications_for_pharmacy(id.clone()).unwrap().is_empty());
    }
}

#[test]
fn test_unknown_medicine() {
    let core = open_database_in_memory().unwrap();
    add_pharmacy(&core, "a", 1.0);

    let err = core
        .notify_demand("Nonexistent Drug".into(), 0.0, 0.0)
        .unwrap_err();
    assert!(matches!(err, MedStockError::NotFound(_)));
}

#[test]
fn test_invalid_origin() {
    let core = open_database_in_memory().unwrap();
    add_medicine(&core, "Benadryl");

    let err = core
        .notify_demand("Benadryl".into(), -95.0, 0.0)
        .unwrap_err();
    assert!(matches!(err, MedStockError::InvalidInput(_)));
}

#[test]
fn test_explicit_radius_overrides_configured_one() {
    let core = open_database_in_memory().unwrap();
    add_medicine(&core, "Benadryl");
    let (near, _) = add_pharmacy(&core, "near", 3.0);
    let (mid, _) = add_pharmacy(&core, "mid", 15.0);

    let notice = core
        .notify_demand_within("Benadryl".into(), 0.0, 0.0, 5.0)
        .unwrap();
    assert_eq!(notice.notified_count, 1);
    assert_eq!(core.notifications_for_pharmacy(near).unwrap().len(), 1);
    assert!(core.notifications_for_pharmacy(mid).unwrap().is_empty());

    for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = core
            .notify_demand_within("Benadryl".into(), 0.0, 0.0, radius)
            .unwrap_err();
        assert!(matches!(err, MedStockError::InvalidInput(_)));
    }
}

#[test]
fn test_mark_read_and_unread_count() {
    let core = open_database_in_memory().unwrap();
    add_medicine(&core, "Benadryl");
    let (pharmacy_id, _) = add_pharmacy(&core, "a", 1.0);

    core.notify_demand("Benadryl".into(), 0.0, 0.0).unwrap();
    core.notify_demand("Benadryl".into(), 0.0, 0.0).unwrap();
    assert_eq!(core.unread_notification_count(pharmacy_id.clone()).unwrap(), 2);

    let notes = core.notifications_for_pharmacy(pharmacy_id.clone()).unwrap();
    core.mark_notification_read(notes[0].id.clone()).unwrap();
    assert_eq!(core.unread_notification_count(pharmacy_id).unwrap(), 1);

    let err = core.mark_notification_read("missing".into()).unwrap_err();
    assert!(matches!(err, MedStockError::NotFound(_)));
}

#[test]
fn test_config_controls_radius_and_message() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("medstock.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "search_radius_km = 5.0").unwrap();
    writeln!(file, "demand_message = \"Restock {{medicine}} please\"").unwrap();
    drop(file);

    let db_path = dir.path().join("medstock.db");
    let core = open_database_with_config(
        db_path.to_string_lossy().into_owned(),
        config_path.to_string_lossy().into_owned(),
    )
    .unwrap();
    assert_eq!(core.search_radius_km(), 5.0);

    add_medicine(&core, "Benadryl");
    let (near, _) = add_pharmacy(&core, "near", 4.0);
    let (far, _) = add_pharmacy(&core, "far", 6.0);

    let notice = core.notify_demand("Benadryl".into(), 0.0, 0.0).unwrap();
    assert_eq!(notice.notified_count, 1);

    let notes = core.notifications_for_pharmacy(near).unwrap();
    assert_eq!(notes[0].message, "Restock Benadryl please");
    assert!(core.notifications_for_pharmacy(far).unwrap().is_empty());
}

#[test]
fn test_bad_config_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("medstock.toml");
    std::fs::write(&config_path, "search_radius_km = -2.0\n").unwrap();

    let result = open_database_with_config(
        dir.path().join("medstock.db").to_string_lossy().into_owned(),
        config_path.to_string_lossy().into_owned(),
    );
    assert!(matches!(result, Err(MedStockError::ConfigError(_))));
}

#[test]
fn test_notifier_against_file_backed_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("medstock.db")).unwrap();

    let medicine = Medicine::new("Benadryl".into());
    db.insert_medicine(&medicine).unwrap();
    for i in 0..4 {
        let p = Pharmacy::new(
            format!("P{}", i),
            "Somewhere".into(),
            format!("p{}@pharmacy.test", i),
            GeoPoint::new(0.0, lon_for_km(i as f64 * 8.0)),
        );
        db.insert_pharmacy(&p).unwrap();
    }

    // 0, 8 and 16 km are inside; 24 km is not
    let notifier = Notifier::new(&db);
    let count = notifier
        .notify_demand("Benadryl", GeoPoint::new(0.0, 0.0), 20.0)
        .unwrap();
    assert_eq!(count, 3);
}
