//! Static region and service catalog behind every SEO landing page.
//!
//! The catalog is a deliberately bounded seed set: each state lists a handful
//! of major cities, not a full gazetteer. URL segments are produced with
//! [`slugify`], and resolving a segment back to an entity is an exact lookup
//! against the computed slugs; anything else is "not found".

use std::collections::HashSet;

use serde::Serialize;

use crate::CatalogError;

/// A US state and the cities that get their own landing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct State {
    pub name: &'static str,
    pub code: &'static str,
    pub major_cities: &'static [&'static str],
}

impl State {
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(self.name)
    }
}

/// A service category with a stable URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub slug: &'static str,
    pub display_name: &'static str,
}

/// A city resolved inside its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CityMatch {
    pub city: &'static str,
    pub state: &'static State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeoPageKind {
    State,
    StateService,
    City,
    CityService,
}

/// One enumerated landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoPage {
    pub path: String,
    pub kind: SeoPageKind,
}

/// Lowercase a name and join its whitespace-separated words with `-`.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Slug for a free-text search location, e.g. `"Austin, TX 78701"` →
/// `"austin-tx-78701"`. Punctuation is dropped before words are joined.
#[must_use]
pub fn location_slug(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    slugify(&kept)
}

#[derive(Debug, Clone, Copy)]
pub struct LocationCatalog {
    states: &'static [State],
    services: &'static [Service],
}

impl Default for LocationCatalog {
    fn default() -> Self {
        Self::us()
    }
}

impl LocationCatalog {
    /// The production catalog: 50 states and the livestock services.
    #[must_use]
    pub fn us() -> Self {
        Self::new(US_STATES, LIVESTOCK_SERVICES)
    }

    #[must_use]
    pub fn new(states: &'static [State], services: &'static [Service]) -> Self {
        Self { states, services }
    }

    #[must_use]
    pub fn states(&self) -> &'static [State] {
        self.states
    }

    #[must_use]
    pub fn services(&self) -> &'static [Service] {
        self.services
    }

    #[must_use]
    pub fn resolve_state(&self, slug: &str) -> Option<&'static State> {
        self.states.iter().find(|state| state.slug() == slug)
    }

    /// Resolve a city slug within a state slug. The city must be one of the
    /// state's listed major cities.
    #[must_use]
    pub fn resolve_city(&self, state_slug: &str, city_slug: &str) -> Option<CityMatch> {
        let state = self.resolve_state(state_slug)?;
        let city = state
            .major_cities
            .iter()
            .find(|city| slugify(city) == city_slug)?;
        Some(CityMatch { city, state })
    }

    #[must_use]
    pub fn resolve_service(&self, slug: &str) -> Option<&'static Service> {
        self.services.iter().find(|service| service.slug == slug)
    }

    /// Every landing page in sitemap order: a state, its service pages, then
    /// each city followed by that city's service pages.
    #[must_use]
    pub fn enumerate_pages(&self) -> Vec<SeoPage> {
        let mut pages = Vec::new();
        for state in self.states {
            let state_slug = state.slug();
            pages.push(SeoPage {
                path: format!("/{state_slug}"),
                kind: SeoPageKind::State,
            });
            for service in self.services {
                pages.push(SeoPage {
                    path: format!("/{state_slug}/{}", service.slug),
                    kind: SeoPageKind::StateService,
                });
            }
            for city in state.major_cities {
                let city_slug = slugify(city);
                pages.push(SeoPage {
                    path: format!("/{state_slug}/{city_slug}"),
                    kind: SeoPageKind::City,
                });
                for service in self.services {
                    pages.push(SeoPage {
                        path: format!("/{state_slug}/{city_slug}/{}", service.slug),
                        kind: SeoPageKind::CityService,
                    });
                }
            }
        }
        pages
    }

    #[must_use]
    pub fn enumerate_all_paths(&self) -> Vec<String> {
        self.enumerate_pages()
            .into_iter()
            .map(|page| page.path)
            .collect()
    }

    /// Check that slugs are unique where routes would otherwise collide:
    /// state slugs, service slugs, city slugs within a state, and city slugs
    /// against service slugs (both occupy the second path segment).
    ///
    /// # Errors
    ///
    /// Returns the first collision found as a [`CatalogError`].
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut service_slugs = HashSet::new();
        for service in self.services {
            if !service_slugs.insert(service.slug) {
                return Err(CatalogError::DuplicateServiceSlug(service.slug.to_string()));
            }
        }

        let mut state_slugs = HashSet::new();
        for state in self.states {
            let state_slug = state.slug();
            if !state_slugs.insert(state_slug.clone()) {
                return Err(CatalogError::DuplicateStateSlug(state_slug));
            }

            let mut city_slugs = HashSet::new();
            for city in state.major_cities {
                let city_slug = slugify(city);
                if service_slugs.contains(city_slug.as_str()) {
                    return Err(CatalogError::CityShadowsService {
                        state: state.name.to_string(),
                        city: (*city).to_string(),
                    });
                }
                if !city_slugs.insert(city_slug) {
                    return Err(CatalogError::DuplicateCity {
                        state: state.name.to_string(),
                        city: (*city).to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Species a vendor may list. Unknown labels are kept as entered.
pub const LIVESTOCK_SPECIES: &[&str] = &["Horse", "Cattle", "Sheep", "Goats", "Pigs", "Other"];

pub static LIVESTOCK_SERVICES: &[Service] = &[
    Service {
        slug: "dead-horse-removal",
        display_name: "Dead Horse Removal",
    },
    Service {
        slug: "dead-cattle-removal",
        display_name: "Dead Cattle Removal",
    },
    Service {
        slug: "dead-sheep-removal",
        display_name: "Dead Sheep/Goat Removal",
    },
    Service {
        slug: "livestock-removal-services",
        display_name: "Livestock Removal Services",
    },
    Service {
        slug: "emergency-livestock-removal",
        display_name: "Emergency Livestock Removal",
    },
    Service {
        slug: "farm-cleanup-services",
        display_name: "Farm Cleanup Services",
    },
];

macro_rules! state {
    ($name:literal, $code:literal, [$($city:literal),* $(,)?]) => {
        State {
            name: $name,
            code: $code,
            major_cities: &[$($city),*],
        }
    };
}

pub static US_STATES: &[State] = &[
    state!("Alabama", "AL", ["Birmingham", "Montgomery", "Mobile", "Huntsville"]),
    state!("Alaska", "AK", ["Anchorage", "Fairbanks", "Juneau"]),
    state!("Arizona", "AZ", ["Phoenix", "Tucson", "Mesa", "Chandler", "Scottsdale"]),
    state!("Arkansas", "AR", ["Little Rock", "Fort Smith", "Fayetteville"]),
    state!("California", "CA", ["Los Angeles", "San Francisco", "San Diego", "Sacramento", "Fresno"]),
    state!("Colorado", "CO", ["Denver", "Colorado Springs", "Aurora", "Fort Collins"]),
    state!("Connecticut", "CT", ["Hartford", "New Haven", "Stamford", "Waterbury"]),
    state!("Delaware", "DE", ["Wilmington", "Dover", "Newark"]),
    state!("Florida", "FL", ["Miami", "Tampa", "Orlando", "Jacksonville", "Fort Lauderdale"]),
    state!("Georgia", "GA", ["Atlanta", "Augusta", "Columbus", "Savannah"]),
    state!("Hawaii", "HI", ["Honolulu", "Hilo", "Kailua-Kona"]),
    state!("Idaho", "ID", ["Boise", "Meridian", "Nampa", "Idaho Falls"]),
    state!("Illinois", "IL", ["Chicago", "Aurora", "Rockford", "Joliet", "Naperville"]),
    state!("Indiana", "IN", ["Indianapolis", "Fort Wayne", "Evansville", "South Bend"]),
    state!("Iowa", "IA", ["Des Moines", "Cedar Rapids", "Davenport", "Sioux City"]),
    state!("Kansas", "KS", ["Wichita", "Overland Park", "Kansas City", "Topeka"]),
    state!("Kentucky", "KY", ["Louisville", "Lexington", "Bowling Green", "Owensboro"]),
    state!("Louisiana", "LA", ["New Orleans", "Baton Rouge", "Shreveport", "Lafayette"]),
    state!("Maine", "ME", ["Portland", "Lewiston", "Bangor"]),
    state!("Maryland", "MD", ["Baltimore", "Frederick", "Rockville", "Gaithersburg"]),
    state!("Massachusetts", "MA", ["Boston", "Worcester", "Springfield", "Cambridge"]),
    state!("Michigan", "MI", ["Detroit", "Grand Rapids", "Warren", "Sterling Heights"]),
    state!("Minnesota", "MN", ["Minneapolis", "Saint Paul", "Rochester", "Duluth"]),
    state!("Mississippi", "MS", ["Jackson", "Gulfport", "Southaven", "Hattiesburg"]),
    state!("Missouri", "MO", ["Kansas City", "Saint Louis", "Springfield", "Columbia"]),
    state!("Montana", "MT", ["Billings", "Missoula", "Great Falls", "Bozeman"]),
    state!("Nebraska", "NE", ["Omaha", "Lincoln", "Bellevue", "Grand Island"]),
    state!("Nevada", "NV", ["Las Vegas", "Henderson", "Reno", "North Las Vegas"]),
    state!("New Hampshire", "NH", ["Manchester", "Nashua", "Concord"]),
    state!("New Jersey", "NJ", ["Newark", "Jersey City", "Paterson", "Elizabeth"]),
    state!("New Mexico", "NM", ["Albuquerque", "Las Cruces", "Rio Rancho", "Santa Fe"]),
    state!("New York", "NY", ["New York City", "Buffalo", "Rochester", "Syracuse", "Albany"]),
    state!("North Carolina", "NC", ["Charlotte", "Raleigh", "Greensboro", "Durham", "Winston-Salem"]),
    state!("North Dakota", "ND", ["Fargo", "Bismarck", "Grand Forks", "Minot"]),
    state!("Ohio", "OH", ["Columbus", "Cleveland", "Cincinnati", "Toledo", "Akron"]),
    state!("Oklahoma", "OK", ["Oklahoma City", "Tulsa", "Norman", "Broken Arrow"]),
    state!("Oregon", "OR", ["Portland", "Salem", "Eugene", "Gresham"]),
    state!("Pennsylvania", "PA", ["Philadelphia", "Pittsburgh", "Allentown", "Erie"]),
    state!("Rhode Island", "RI", ["Providence", "Warwick", "Cranston"]),
    state!("South Carolina", "SC", ["Charleston", "Columbia", "North Charleston", "Mount Pleasant"]),
    state!("South Dakota", "SD", ["Sioux Falls", "Rapid City", "Aberdeen", "Brookings"]),
    state!("Tennessee", "TN", ["Nashville", "Memphis", "Knoxville", "Chattanooga"]),
    state!("Texas", "TX", ["Houston", "San Antonio", "Dallas", "Austin", "Fort Worth"]),
    state!("Utah", "UT", ["Salt Lake City", "West Valley City", "Provo", "West Jordan"]),
    state!("Vermont", "VT", ["Burlington", "Essex", "South Burlington"]),
    state!("Virginia", "VA", ["Virginia Beach", "Norfolk", "Chesapeake", "Richmond"]),
    state!("Washington", "WA", ["Seattle", "Spokane", "Tacoma", "Vancouver"]),
    state!("West Virginia", "WV", ["Charleston", "Huntington", "Morgantown"]),
    state!("Wisconsin", "WI", ["Milwaukee", "Madison", "Green Bay", "Kenosha"]),
    state!("Wyoming", "WY", ["Cheyenne", "Casper", "Laramie"]),
];

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
