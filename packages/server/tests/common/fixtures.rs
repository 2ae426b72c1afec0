//! Test fixtures for creating company records.

use server_core::domains::companies::Company;

/// A company with the given name and a website derived from it.
pub fn company(name: &str) -> Company {
    Company::builder()
        .name(name)
        .website(format!(
            "{}.example.com",
            name.to_lowercase().replace(' ', "-")
        ))
        .build()
}

/// A small mixed dataset used by the search tests.
pub fn sample_companies() -> Vec<Company> {
    vec![
        Company::builder()
            .name("Bankers Inc")
            .website("bankers.example.com")
            .industry("Banking")
            .country("United States")
            .region("New York")
            .size("1001-5000")
            .founded(1998)
            .ai_summary("Bankers Inc offers payment processing for retailers.")
            .build(),
        Company::builder()
            .name("Acme Fintech")
            .website("acme-fintech.example.com")
            .industry("Fintech")
            .country("Germany")
            .region("Berlin")
            .size("51-200")
            .founded(2015)
            .build(),
        Company::builder()
            .name("Globex")
            .website("globex.example.com")
            .industry("Software")
            .country("United States")
            .region("California")
            .size("51-200")
            .founded(2015)
            .ai_summary("Globex builds developer tools.")
            .build(),
        Company::builder()
            .name("Initech")
            .website("initech.example.com")
            .industry("Software")
            .country("Canada")
            .region("Ontario")
            .size("11-50")
            .founded(2004)
            .build(),
    ]
}

/// `count` companies named `Company 00`, `Company 01`, ...
pub fn numbered_companies(count: usize) -> Vec<Company> {
    (0..count)
        .map(|i| company(&format!("Company {i:02}")))
        .collect()
}
