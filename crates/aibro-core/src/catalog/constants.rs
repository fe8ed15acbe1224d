//! Fixed region and industry vocabularies.

/// Wildcard region: announcements tagged with it apply everywhere.
pub const NATIONWIDE: &str = "nationwide";

/// Region codes offered by the profile form, wildcard first.
pub const REGIONS: &[&str] = &[
    NATIONWIDE,
    "seoul",
    "busan",
    "daegu",
    "incheon",
    "gwangju",
    "daejeon",
    "ulsan",
    "sejong",
    "gyeonggi",
    "gangwon",
    "chungbuk",
    "chungnam",
    "jeonbuk",
    "jeonnam",
    "gyeongbuk",
    "gyeongnam",
    "jeju",
];

/// Fallback industry; also used by the default profile.
pub const OTHER_INDUSTRY: &str = "other";

/// Industry categories offered by the profile form.
pub const INDUSTRIES: &[&str] = &[
    "wholesale and retail",
    "accommodation and food service",
    "manufacturing",
    "construction",
    "transportation and warehousing",
    "information and communication",
    "arts, sports and recreation",
    OTHER_INDUSTRY,
];

pub fn is_known_region(region: &str) -> bool {
    REGIONS.contains(&region)
}

pub fn is_known_industry(industry: &str) -> bool {
    INDUSTRIES.contains(&industry)
}
