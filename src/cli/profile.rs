use crate::error::Result;
use crate::models::AgentProfile;
use crate::profile::{cache_path, clear_cached, load_cached, save_cached};

fn print_profile(p: &AgentProfile) {
    println!("Nama Agen      : {}", p.name);
    println!("Alamat         : {}", p.address);
    println!("Email          : {}", p.email);
    println!("No. Registrasi : {}", p.registration_no);
    println!("Wilayah        : {}", p.region);
}

pub fn show() -> Result<()> {
    match load_cached(&cache_path()) {
        Some(profile) => print_profile(&profile),
        None => {
            println!("No cached profile; reports use the built-in defaults:");
            print_profile(&AgentProfile::default());
        }
    }
    Ok(())
}

pub fn set(file: &str) -> Result<()> {
    let raw = std::fs::read_to_string(file)?;
    let profile: AgentProfile = serde_json::from_str(&raw)?;
    save_cached(&cache_path(), &profile)?;
    println!("Cached profile for {}", profile.name);
    Ok(())
}

pub fn clear() -> Result<()> {
    clear_cached(&cache_path())?;
    println!("Cleared cached profile.");
    Ok(())
}
