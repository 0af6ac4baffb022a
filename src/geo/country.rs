//! Built-in country table
//!
//! Sovereign states plus a few territories Nominatim reports under their own
//! country code.
//!
//! Bounding boxes are coarse (mainland only for countries with far-flung
//! territories). Points that land at sea or across a border are filtered
//! later by the POI search and the country code check.

use crate::constants::geo::{WORLD_MAX_LAT, WORLD_MIN_LAT};
use crate::error::{Error, Result};
use crate::geo::{BoundingBox, Coordinates};
use rand::seq::SliceRandom;
use rand::Rng;

/// A country the random center can be constrained to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Country {
    pub name: &'static str,
    /// Lower-case ISO 3166-1 alpha-2 code, as reported by Nominatim
    pub code: &'static str,
    pub bbox: BoundingBox,
}

macro_rules! country {
    ($name:expr, $code:expr, $min_lng:expr, $min_lat:expr, $max_lng:expr, $max_lat:expr) => {
        Country {
            name: $name,
            code: $code,
            bbox: BoundingBox::new($min_lng, $min_lat, $max_lng, $max_lat),
        }
    };
}

pub const COUNTRIES: &[Country] = &[
    country!("Afghanistan", "af", 60.53, 29.32, 75.16, 38.49),
    country!("Albania", "al", 19.30, 39.62, 21.02, 42.69),
    country!("Algeria", "dz", -8.68, 19.06, 12.00, 37.12),
    country!("Andorra", "ad", 1.41, 42.43, 1.79, 42.66),
    country!("Angola", "ao", 11.64, -17.93, 24.08, -4.44),
    country!("Antigua and Barbuda", "ag", -61.91, 16.99, -61.67, 17.73),
    country!("Argentina", "ar", -73.42, -55.25, -53.63, -21.83),
    country!("Armenia", "am", 43.58, 38.74, 46.51, 41.25),
    country!("Australia", "au", 113.34, -43.63, 153.57, -10.67),
    country!("Austria", "at", 9.48, 46.43, 16.98, 49.04),
    country!("Azerbaijan", "az", 44.79, 38.27, 50.39, 41.86),
    country!("Bahamas", "bs", -79.00, 20.91, -72.71, 27.26),
    country!("Bahrain", "bh", 50.38, 25.79, 50.82, 26.33),
    country!("Bangladesh", "bd", 88.08, 20.67, 92.67, 26.45),
    country!("Barbados", "bb", -59.65, 13.04, -59.42, 13.34),
    country!("Belarus", "by", 23.20, 51.32, 32.69, 56.17),
    country!("Belgium", "be", 2.51, 49.53, 6.16, 51.48),
    country!("Belize", "bz", -89.23, 15.89, -88.11, 18.50),
    country!("Benin", "bj", 0.77, 6.14, 3.85, 12.24),
    country!("Bhutan", "bt", 88.81, 26.72, 92.10, 28.30),
    country!("Bolivia", "bo", -69.59, -22.90, -57.45, -9.68),
    country!("Bosnia and Herzegovina", "ba", 15.75, 42.65, 19.60, 45.23),
    country!("Botswana", "bw", 20.00, -26.83, 29.43, -17.66),
    country!("Brazil", "br", -73.99, -33.77, -34.73, 5.24),
    country!("Brunei", "bn", 114.20, 4.01, 115.36, 5.05),
    country!("Bulgaria", "bg", 22.38, 41.23, 28.61, 44.23),
    country!("Burkina Faso", "bf", -5.47, 9.61, 2.41, 15.08),
    country!("Burundi", "bi", 29.02, -4.50, 30.75, -2.35),
    country!("Cambodia", "kh", 102.35, 10.49, 107.61, 14.69),
    country!("Cameroon", "cm", 8.49, 1.73, 16.01, 12.86),
    country!("Canada", "ca", -141.00, 41.68, -52.65, 73.23),
    country!("Cape Verde", "cv", -25.36, 14.80, -22.66, 17.21),
    country!("Central African Republic", "cf", 14.46, 2.27, 27.37, 11.14),
    country!("Chad", "td", 13.54, 7.42, 23.89, 23.41),
    country!("Chile", "cl", -75.64, -55.61, -66.96, -17.58),
    country!("China", "cn", 73.68, 18.20, 135.03, 53.46),
    country!("Colombia", "co", -78.99, -4.30, -66.88, 12.44),
    country!("Comoros", "km", 43.22, -12.42, 44.54, -11.36),
    country!("Costa Rica", "cr", -85.94, 8.23, -82.55, 11.22),
    country!("Croatia", "hr", 13.66, 42.48, 19.39, 46.50),
    country!("Cuba", "cu", -84.97, 19.86, -74.18, 23.19),
    country!("Cyprus", "cy", 32.26, 34.57, 34.60, 35.70),
    country!("Czechia", "cz", 12.24, 48.56, 18.85, 51.12),
    country!("Democratic Republic of the Congo", "cd", 12.18, -13.26, 31.17, 5.26),
    country!("Denmark", "dk", 8.09, 54.80, 12.69, 57.73),
    country!("Djibouti", "dj", 41.66, 10.93, 43.32, 12.70),
    country!("Dominica", "dm", -61.48, 15.20, -61.24, 15.64),
    country!("Dominican Republic", "do", -71.95, 17.60, -68.32, 19.88),
    country!("East Timor", "tl", 124.04, -9.50, 127.34, -8.13),
    country!("Ecuador", "ec", -80.97, -5.00, -75.23, 1.38),
    country!("Egypt", "eg", 24.70, 22.00, 36.87, 31.59),
    country!("El Salvador", "sv", -90.10, 13.15, -87.72, 14.42),
    country!("Equatorial Guinea", "gq", 9.31, 1.01, 11.29, 2.28),
    country!("Eritrea", "er", 36.32, 12.36, 43.08, 18.00),
    country!("Estonia", "ee", 23.34, 57.47, 28.13, 59.61),
    country!("Eswatini", "sz", 30.68, -27.29, 32.07, -25.66),
    country!("Ethiopia", "et", 32.95, 3.42, 47.79, 14.96),
    country!("Fiji", "fj", 177.00, -19.00, 179.99, -16.00),
    country!("Finland", "fi", 20.65, 59.81, 31.52, 70.16),
    country!("France", "fr", -5.00, 42.50, 9.56, 51.15),
    country!("Gabon", "ga", 8.80, -3.98, 14.43, 2.33),
    country!("Gambia", "gm", -16.84, 13.13, -13.84, 13.88),
    country!("Georgia", "ge", 39.96, 41.06, 46.64, 43.55),
    country!("Germany", "de", 5.99, 47.30, 15.02, 54.98),
    country!("Ghana", "gh", -3.24, 4.71, 1.06, 11.10),
    country!("Greece", "gr", 20.15, 34.92, 26.60, 41.83),
    country!("Greenland", "gl", -73.30, 59.80, -12.20, 83.60),
    country!("Grenada", "gd", -61.80, 11.98, -61.58, 12.53),
    country!("Guatemala", "gt", -92.23, 13.74, -88.23, 17.82),
    country!("Guinea", "gn", -15.13, 7.31, -7.83, 12.59),
    country!("Guinea-Bissau", "gw", -16.68, 10.92, -13.64, 12.68),
    country!("Guyana", "gy", -61.41, 1.27, -56.54, 8.37),
    country!("Haiti", "ht", -74.46, 18.03, -71.62, 19.92),
    country!("Honduras", "hn", -89.35, 12.98, -83.15, 16.01),
    country!("Hungary", "hu", 16.20, 45.76, 22.71, 48.62),
    country!("Iceland", "is", -24.33, 63.50, -13.72, 66.53),
    country!("India", "in", 68.18, 7.97, 97.40, 35.49),
    country!("Indonesia", "id", 95.29, -10.36, 141.03, 5.48),
    country!("Iran", "ir", 44.11, 25.08, 63.32, 39.71),
    country!("Iraq", "iq", 38.79, 29.10, 48.57, 37.39),
    country!("Ireland", "ie", -9.98, 51.67, -6.03, 55.13),
    country!("Israel", "il", 34.27, 29.50, 35.84, 33.28),
    country!("Italy", "it", 6.75, 36.62, 18.48, 47.12),
    country!("Ivory Coast", "ci", -8.60, 4.34, -2.56, 10.52),
    country!("Jamaica", "jm", -78.37, 17.70, -76.18, 18.52),
    country!("Japan", "jp", 129.41, 31.03, 145.54, 45.55),
    country!("Jordan", "jo", 34.92, 29.20, 39.20, 33.38),
    country!("Kazakhstan", "kz", 46.47, 40.66, 87.36, 55.39),
    country!("Kenya", "ke", 33.89, -4.68, 41.86, 5.51),
    country!("Kiribati", "ki", 172.90, 1.30, 173.20, 2.00),
    country!("Kosovo", "xk", 20.01, 41.86, 21.79, 43.27),
    country!("Kuwait", "kw", 46.57, 28.53, 48.42, 30.10),
    country!("Kyrgyzstan", "kg", 69.46, 39.23, 80.26, 43.30),
    country!("Laos", "la", 100.12, 13.88, 107.56, 22.46),
    country!("Latvia", "lv", 20.97, 55.67, 28.24, 58.09),
    country!("Lebanon", "lb", 35.13, 33.09, 36.61, 34.69),
    country!("Lesotho", "ls", 27.01, -30.68, 29.46, -28.57),
    country!("Liberia", "lr", -11.49, 4.36, -7.37, 8.55),
    country!("Libya", "ly", 9.32, 19.58, 25.15, 33.17),
    country!("Liechtenstein", "li", 9.47, 47.05, 9.64, 47.27),
    country!("Lithuania", "lt", 20.94, 53.91, 26.84, 56.45),
    country!("Luxembourg", "lu", 5.73, 49.45, 6.53, 50.18),
    country!("Madagascar", "mg", 43.22, -25.61, 50.48, -11.95),
    country!("Malawi", "mw", 32.67, -17.13, 35.92, -9.37),
    country!("Malaysia", "my", 99.64, 0.85, 119.27, 7.36),
    country!("Maldives", "mv", 72.64, -0.70, 73.76, 7.11),
    country!("Mali", "ml", -12.24, 10.16, 4.27, 25.00),
    country!("Malta", "mt", 14.18, 35.79, 14.58, 36.08),
    country!("Marshall Islands", "mh", 165.50, 5.60, 172.00, 14.60),
    country!("Mauritania", "mr", -17.07, 14.72, -4.83, 27.30),
    country!("Mauritius", "mu", 57.30, -20.53, 57.81, -19.97),
    country!("Mexico", "mx", -117.13, 14.54, -86.81, 32.72),
    country!("Micronesia", "fm", 138.00, 5.20, 163.10, 9.70),
    country!("Moldova", "md", 26.62, 45.47, 30.16, 48.49),
    country!("Monaco", "mc", 7.41, 43.72, 7.44, 43.75),
    country!("Mongolia", "mn", 87.75, 41.60, 119.93, 52.15),
    country!("Montenegro", "me", 18.43, 41.85, 20.36, 43.56),
    country!("Morocco", "ma", -17.02, 21.42, -1.12, 35.76),
    country!("Mozambique", "mz", 30.22, -26.87, 40.84, -10.47),
    country!("Myanmar", "mm", 92.17, 9.78, 101.18, 28.54),
    country!("Namibia", "na", 11.73, -28.97, 25.26, -16.96),
    country!("Nauru", "nr", 166.90, -0.56, 166.96, -0.50),
    country!("Nepal", "np", 80.06, 26.35, 88.20, 30.45),
    country!("Netherlands", "nl", 3.31, 50.80, 7.09, 53.51),
    country!("New Caledonia", "nc", 163.60, -22.70, 167.20, -20.10),
    country!("New Zealand", "nz", 166.51, -46.64, 178.52, -34.45),
    country!("Nicaragua", "ni", -87.69, 10.71, -83.13, 15.03),
    country!("Niger", "ne", 0.17, 11.70, 15.99, 23.52),
    country!("Nigeria", "ng", 2.67, 4.27, 14.68, 13.89),
    country!("North Korea", "kp", 124.18, 37.67, 130.70, 43.01),
    country!("North Macedonia", "mk", 20.45, 40.85, 23.04, 42.37),
    country!("Norway", "no", 4.99, 58.08, 31.29, 70.92),
    country!("Oman", "om", 52.00, 16.65, 59.84, 26.40),
    country!("Pakistan", "pk", 60.87, 23.69, 77.84, 37.10),
    country!("Palau", "pw", 134.10, 6.90, 134.70, 7.80),
    country!("Palestine", "ps", 34.22, 31.22, 35.57, 32.55),
    country!("Panama", "pa", -83.05, 7.20, -77.16, 9.65),
    country!("Papua New Guinea", "pg", 140.84, -11.66, 156.02, -1.35),
    country!("Paraguay", "py", -62.65, -27.61, -54.26, -19.29),
    country!("Peru", "pe", -81.41, -18.35, -68.67, -0.06),
    country!("Philippines", "ph", 116.93, 4.59, 126.60, 21.12),
    country!("Poland", "pl", 14.07, 49.03, 24.03, 54.85),
    country!("Portugal", "pt", -9.53, 36.84, -6.39, 42.28),
    country!("Puerto Rico", "pr", -67.27, 17.92, -65.59, 18.52),
    country!("Qatar", "qa", 50.74, 24.47, 51.64, 26.18),
    country!("Republic of the Congo", "cg", 11.09, -5.04, 18.65, 3.70),
    country!("Romania", "ro", 20.22, 43.69, 29.63, 48.22),
    country!("Russia", "ru", 27.32, 41.19, 179.99, 77.72),
    country!("Rwanda", "rw", 28.86, -2.84, 30.90, -1.05),
    country!("Saint Kitts and Nevis", "kn", -62.87, 17.09, -62.54, 17.42),
    country!("Saint Lucia", "lc", -61.08, 13.71, -60.87, 14.11),
    country!("Saint Vincent and the Grenadines", "vc", -61.46, 12.58, -61.11, 13.38),
    country!("Samoa", "ws", -172.80, -14.08, -171.40, -13.43),
    country!("San Marino", "sm", 12.40, 43.89, 12.52, 43.99),
    country!("Sao Tome and Principe", "st", 6.46, 0.02, 7.47, 1.70),
    country!("Saudi Arabia", "sa", 34.49, 16.38, 55.67, 32.16),
    country!("Senegal", "sn", -17.54, 12.31, -11.35, 16.69),
    country!("Serbia", "rs", 18.82, 42.23, 23.01, 46.19),
    country!("Seychelles", "sc", 55.22, -4.80, 55.80, -4.28),
    country!("Sierra Leone", "sl", -13.30, 6.92, -10.27, 10.00),
    country!("Singapore", "sg", 103.60, 1.16, 104.09, 1.47),
    country!("Slovakia", "sk", 16.83, 47.73, 22.57, 49.61),
    country!("Slovenia", "si", 13.38, 45.42, 16.61, 46.88),
    country!("Solomon Islands", "sb", 155.39, -11.85, 162.40, -6.59),
    country!("Somalia", "so", 40.98, -1.68, 51.42, 11.99),
    country!("South Africa", "za", 16.34, -34.82, 32.83, -22.09),
    country!("South Korea", "kr", 126.12, 34.39, 129.47, 38.61),
    country!("South Sudan", "ss", 23.89, 3.51, 35.95, 12.24),
    country!("Spain", "es", -9.39, 35.95, 3.04, 43.75),
    country!("Sri Lanka", "lk", 79.65, 5.92, 81.88, 9.84),
    country!("Sudan", "sd", 21.81, 8.68, 38.61, 22.23),
    country!("Suriname", "sr", -58.07, 1.83, -53.98, 6.01),
    country!("Sweden", "se", 11.03, 55.36, 23.90, 69.11),
    country!("Switzerland", "ch", 6.02, 45.78, 10.44, 47.83),
    country!("Syria", "sy", 35.73, 32.31, 42.38, 37.32),
    country!("Taiwan", "tw", 120.03, 21.90, 121.95, 25.30),
    country!("Tajikistan", "tj", 67.34, 36.67, 75.15, 41.04),
    country!("Tanzania", "tz", 29.33, -11.75, 40.44, -0.99),
    country!("Thailand", "th", 97.38, 5.69, 105.59, 20.42),
    country!("Togo", "tg", -0.15, 6.10, 1.81, 11.14),
    country!("Tonga", "to", -175.68, -21.46, -173.91, -15.56),
    country!("Trinidad and Tobago", "tt", -61.93, 10.04, -60.49, 11.36),
    country!("Tunisia", "tn", 7.52, 30.23, 11.60, 37.54),
    country!("Turkey", "tr", 26.04, 35.82, 44.79, 42.14),
    country!("Turkmenistan", "tm", 52.44, 35.13, 66.68, 42.80),
    country!("Tuvalu", "tv", 176.00, -10.80, 179.90, -5.60),
    country!("Uganda", "ug", 29.57, -1.48, 35.00, 4.23),
    country!("Ukraine", "ua", 22.14, 44.39, 40.23, 52.38),
    country!("United Arab Emirates", "ae", 51.58, 22.63, 56.38, 26.08),
    country!("United Kingdom", "gb", -7.57, 49.96, 1.68, 58.64),
    country!("United States of America", "us", -125.00, 24.60, -66.90, 49.40),
    country!("Uruguay", "uy", -58.44, -34.97, -53.07, -30.08),
    country!("Uzbekistan", "uz", 55.99, 37.18, 73.14, 45.59),
    country!("Vanuatu", "vu", 166.52, -20.25, 170.24, -13.07),
    country!("Vatican City", "va", 12.445, 41.900, 12.458, 41.907),
    country!("Venezuela", "ve", -73.38, 0.65, -59.80, 12.20),
    country!("Vietnam", "vn", 102.17, 8.60, 109.34, 23.35),
    country!("Western Sahara", "eh", -17.10, 20.80, -8.67, 27.67),
    country!("Yemen", "ye", 42.55, 12.11, 53.11, 19.00),
    country!("Zambia", "zm", 21.99, -18.08, 33.71, -8.22),
    country!("Zimbabwe", "zw", 25.24, -22.42, 33.06, -15.61),
];

/// Other common names, mapped to codes
const ALIASES: &[(&str, &str)] = &[
    ("Cabo Verde", "cv"),
    ("Côte d'Ivoire", "ci"),
    ("Czech Republic", "cz"),
    ("DR Congo", "cd"),
    ("Federated States of Micronesia", "fm"),
    ("Holy See", "va"),
    ("Macedonia", "mk"),
    ("Republic of Serbia", "rs"),
    ("Swaziland", "sz"),
    ("The Bahamas", "bs"),
    ("Timor-Leste", "tl"),
    ("Türkiye", "tr"),
    ("UK", "gb"),
    ("United Republic of Tanzania", "tz"),
    ("United States", "us"),
    ("USA", "us"),
];

/// Look up a country by name, alias or ISO code, case-insensitively
pub fn find_country(query: &str) -> Option<&'static Country> {
    let query = query.trim();
    let code = ALIASES
        .iter()
        .find(|(alias, _)| alias.to_lowercase() == query.to_lowercase())
        .map_or(query, |(_, code)| *code);
    COUNTRIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(query) || c.code.eq_ignore_ascii_case(code))
}

/// Where the random center point may fall
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountryFilter {
    /// A fixed country
    Country(&'static Country),
    /// A country drawn from the table at the start of each run
    Random,
    /// Anywhere in the inhabited latitude band
    World,
}

impl CountryFilter {
    /// Resolve a random filter to a concrete one
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        match self {
            Self::Random => COUNTRIES
                .choose(rng)
                .map(Self::Country)
                .unwrap_or(Self::World),
            other => other,
        }
    }

    /// Country this filter pins, if any
    pub fn country(&self) -> Option<&'static Country> {
        match self {
            Self::Country(country) => Some(*country),
            _ => None,
        }
    }

    /// Draw a random point honoring the filter
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinates {
        match self {
            Self::Country(country) => country.bbox.random_point(rng),
            Self::Random => self.resolve(rng).random_point(rng),
            Self::World => {
                BoundingBox::new(-180.0, WORLD_MIN_LAT, 180.0, WORLD_MAX_LAT).random_point(rng)
            }
        }
    }
}

impl std::str::FromStr for CountryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "world" | "any" => Ok(Self::World),
            _ => find_country(s)
                .map(Self::Country)
                .ok_or_else(|| Error::InvalidArgument(format!("Unknown country: {}", s))),
        }
    }
}

impl std::fmt::Display for CountryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Country(country) => write!(f, "{}", country.name),
            Self::Random => write!(f, "random"),
            Self::World => write!(f, "world"),
        }
    }
}
