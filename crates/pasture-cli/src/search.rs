use pasture_core::{
    DiscoveryEngine, GeoPoint, RadiusSearch, RankedVendor, ServiceMatchMode, VendorFilter,
    VendorRepository,
};

/// Rank active vendors around a point and print them nearest first.
///
/// # Errors
///
/// Returns an error when the coordinates are out of range or the
/// repository cannot be read.
pub(crate) async fn run_search(
    repository: &dyn VendorRepository,
    match_mode: ServiceMatchMode,
    lat: f64,
    lng: f64,
    radius_miles: f64,
    service: Option<&str>,
) -> anyhow::Result<()> {
    let ranked = rank(repository, match_mode, lat, lng, radius_miles, service).await?;

    if ranked.is_empty() {
        println!("No vendors within {radius_miles} miles of {lat},{lng}.");
        return Ok(());
    }

    println!(
        "{:>8}  {:<32} {:<20} {:<3} SERVICES",
        "MILES", "NAME", "CITY", "ST"
    );
    for entry in &ranked {
        println!("{}", format_row(entry));
    }
    println!("{} vendors", ranked.len());
    Ok(())
}

pub(crate) async fn rank(
    repository: &dyn VendorRepository,
    match_mode: ServiceMatchMode,
    lat: f64,
    lng: f64,
    radius_miles: f64,
    service: Option<&str>,
) -> anyhow::Result<Vec<RankedVendor>> {
    let center = GeoPoint::checked(lat, lng)
        .ok_or_else(|| anyhow::anyhow!("coordinates out of range: {lat},{lng}"))?;
    let vendors = repository.fetch(&VendorFilter::active()).await?;

    let mut query = RadiusSearch::new(center, radius_miles);
    if let Some(term) = service.map(str::trim).filter(|term| !term.is_empty()) {
        query = query.with_service_term(term);
    }
    Ok(DiscoveryEngine::new(match_mode).search(&vendors, &query))
}

fn format_row(entry: &RankedVendor) -> String {
    let miles = entry
        .distance_miles
        .map_or_else(|| "-".to_string(), |d| format!("{d:.1}"));
    let vendor = &entry.vendor;
    format!(
        "{miles:>8}  {:<32} {:<20} {:<3} {}",
        truncate(&vendor.name, 32),
        truncate(&vendor.city, 20),
        vendor.state_code,
        vendor.service_types.join(", ")
    )
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}~")
    }
}
