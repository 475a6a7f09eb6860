//! Runs against the real Dog CEO and Yandex Disk APIs.
//!
//! `OAUTH_TOKEN=... cargo test --test live -- --ignored --test-threads=1`

use breed_uploader::{upload_breed_photos, verify_breed_folder, Config, DiskClient, DogCeoApi, ResourceType};

fn run(breed: &str) {
    let config = Config::load().unwrap();
    assert!(config.oauth_token.is_some(), "OAUTH_TOKEN is missing from the env");

    let mut dog = DogCeoApi::new(&config.dog_ceo_base);
    let mut disk = DiskClient::new(&config.disk_base, config.oauth_token.as_deref())
        .unwrap()
        .with_poll(config.poll_policy())
        .with_retry(config.retry_policy());

    let report = upload_breed_photos(&mut dog, &mut disk, breed, &config.folder_name).unwrap();
    let folder = disk.get_folder(&config.folder_path()).unwrap();
    assert_eq!(folder.node.resource_type, ResourceType::Dir);

    if let Err(failures) = verify_breed_folder(&folder, &report, &config.folder_name).finish() {
        panic!("{}", failures);
    }
}

#[test]
#[ignore]
fn upload_doberman() {
    run("doberman");
}

#[test]
#[ignore]
fn upload_bulldog() {
    run("bulldog");
}

#[test]
#[ignore]
fn upload_collie() {
    run("collie");
}

#[test]
#[ignore]
fn upload_spaniel() {
    run("spaniel");
}
