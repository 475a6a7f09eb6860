use std::process::ExitCode;

use breed_uploader::{upload_breed_photos, verify_breed_folder, Config, DiskClient, DogCeoApi};

enum Verdict {
    Passed,
    Failed(String),
}

fn run_breed(config: &Config, dog: &mut DogCeoApi, breed: &str) -> Verdict {
    let mut disk = match DiskClient::new(&config.disk_base, config.oauth_token.as_deref()) {
        Ok(disk) => disk
            .with_poll(config.poll_policy())
            .with_retry(config.retry_policy()),
        Err(e) => return Verdict::Failed(e.to_string()),
    };

    // `disk` deletes the folder when it goes out of scope, on every path below.
    let report = match upload_breed_photos(dog, &mut disk, breed, &config.folder_name) {
        Ok(report) => report,
        Err(e) => return Verdict::Failed(e.to_string()),
    };
    let folder = match disk.get_folder(&config.folder_path()) {
        Ok(folder) => folder,
        Err(e) => return Verdict::Failed(e.to_string()),
    };

    match verify_breed_folder(&folder, &report, &config.folder_name).finish() {
        Ok(()) => Verdict::Passed,
        Err(failures) => Verdict::Failed(failures.to_string()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("breed-uploader - Dog CEO to Yandex Disk end-to-end check");
        println!();
        println!("Usage:");
        println!("  breed-uploader              run the configured breeds");
        println!("  breed-uploader BREED...     run the given breeds");
        println!("  -h, --help                  this help");
        println!();
        println!("Environment: OAUTH_TOKEN, DOG_CEO_BASE_URL, YANDEX_DISK_BASE_URL, DATA_FOLDER");
        return ExitCode::SUCCESS;
    }

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    if !args.is_empty() {
        config.breeds = args;
    }
    log::info!(
        "breeds={:?} folder={} disk={}",
        config.breeds,
        config.folder_path(),
        config.disk_base
    );

    let mut dog = DogCeoApi::new(&config.dog_ceo_base);
    let mut failed = 0;
    for breed in &config.breeds {
        match run_breed(&config, &mut dog, breed) {
            Verdict::Passed => println!("✅ {}", breed),
            Verdict::Failed(reason) => {
                failed += 1;
                println!("❌ {}: {}", breed, reason.trim_end());
            }
        }
    }

    println!("{} passed, {} failed", config.breeds.len() - failed, failed);
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
