use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Auth types
    types.push(clean_type(LoginRequest::export_to_string()?));
    types.push(clean_type(RegisterRequest::export_to_string()?));
    types.push(clean_type(RefreshTokenRequest::export_to_string()?));
    types.push(clean_type(CompanyMembership::export_to_string()?));
    types.push(clean_type(SessionUser::export_to_string()?));
    types.push(clean_type(AuthResponse::export_to_string()?));
    types.push(clean_type(TokenPair::export_to_string()?));

    // Company types
    types.push(clean_type(Company::export_to_string()?));
    types.push(clean_type(CreateCompanyRequest::export_to_string()?));

    // Contact types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(ContactRecord::export_to_string()?));
    types.push(clean_type(ContactPayload::export_to_string()?));
    types.push(clean_type(PageMeta::export_to_string()?));
    types.push(clean_type(PaginatedContacts::export_to_string()?));

    // Import types
    types.push(clean_type(ImportContactsRequest::export_to_string()?));
    types.push(clean_type(ImportSummary::export_to_string()?));
    types.push(clean_type(ImportContactsResponse::export_to_string()?));

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Every type lands in the same file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
