//! Synthetic personal records consumed by the dataset builders.
//!
//! Ownership model:
//! - `RecordGenerator` is the builder-facing capability (`generate(n)`).
//! - `PersonalDataGenerator` is the built-in implementation; it owns its own
//!   seeded RNG so record content does not depend on pipeline draws.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attributes::AttributeValue;
use crate::rng::DeterministicRng;
use crate::types::{AttributeTree, IdentifierMap};

/// One synthetic identity: unique identifiers plus a nested attribute tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalData {
    /// Globally unique identifiers (`name`, `ssn`).
    pub unique_identifiers: IdentifierMap,
    /// Non-unique attributes (profile, financial, contact, ...).
    pub attributes: AttributeTree,
}

/// Source of synthetic identities.
///
/// For a fixed construction seed, the sequence of returned records must be
/// deterministic.
pub trait RecordGenerator {
    /// Produce the next `n` records.
    fn generate(&mut self, n: usize) -> Vec<PersonalData>;
}

const FIRST_NAMES: &[&str] = &[
    "Aaron", "Abigail", "Adrian", "Alice", "Amelia", "Andre", "Anna", "Ben", "Bianca", "Brandon",
    "Caleb", "Carmen", "Chloe", "Daniel", "Diana", "Dmitri", "Elena", "Elijah", "Emma", "Ethan",
    "Felix", "Fiona", "Gabriel", "Grace", "Hannah", "Hugo", "Ian", "Isabel", "Jack", "Jasmine",
    "Julian", "Karen", "Kevin", "Laura", "Leo", "Lucia", "Marcus", "Maria", "Mia", "Nathan",
    "Nina", "Oliver", "Olivia", "Oscar", "Paula", "Peter", "Quinn", "Rachel", "Ruben", "Samuel",
    "Sofia", "Tara", "Thomas", "Uma", "Victor", "Wendy", "Xavier", "Yara", "Zachary", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Alvarez", "Baker", "Bennett", "Brooks", "Campbell", "Carter", "Chen", "Collins",
    "Cooper", "Davis", "Diaz", "Edwards", "Evans", "Fischer", "Flores", "Garcia", "Gray", "Green",
    "Hall", "Harris", "Hughes", "Jackson", "James", "Johnson", "Kelly", "Kim", "Lee", "Lewis",
    "Lopez", "Martin", "Miller", "Moore", "Morgan", "Murphy", "Nelson", "Nguyen", "Ortiz",
    "Parker", "Patel", "Perez", "Price", "Reed", "Reyes", "Rivera", "Roberts", "Ross", "Sanchez",
    "Scott", "Stewart", "Taylor", "Thompson", "Turner", "Walker", "Ward", "Watson", "White",
    "Wilson", "Wright", "Young",
];

const SEXES: &[&str] = &["F", "M"];
const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
const BANK_COUNTRIES: &[&str] = &["GB", "DE", "FR", "NL", "ES", "IT", "US", "CH"];
const CARD_PROVIDERS: &[&str] = &[
    "VISA 16 digit",
    "Mastercard",
    "American Express",
    "Discover",
    "JCB 16 digit",
    "Diners Club / Carte Blanche",
];
const COMPANY_STEMS: &[&str] = &[
    "Acme", "Bright", "Cobalt", "Delta", "Evergreen", "Frontier", "Granite", "Harbor", "Ironwood",
    "Juniper", "Keystone", "Lumen", "Meridian", "Northwind", "Orchard", "Pioneer", "Quarry",
    "Redwood", "Summit", "Vertex",
];
const COMPANY_SUFFIXES: &[&str] = &["LLC", "Inc", "Group", "and Sons", "Ltd", "PLC"];
const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Pine", "Cedar", "Elm", "Willow", "Lake", "Hill", "Sunset", "River", "Park",
    "Washington", "Lincoln", "Jefferson", "Highland", "Meadow",
];
const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Rd", "Blvd", "Ln", "Dr", "Ct", "Way"];
const CITIES: &[(&str, &str)] = &[
    ("Springfield", "IL"),
    ("Portland", "OR"),
    ("Austin", "TX"),
    ("Madison", "WI"),
    ("Denver", "CO"),
    ("Raleigh", "NC"),
    ("Tucson", "AZ"),
    ("Boise", "ID"),
    ("Albany", "NY"),
    ("Salem", "MA"),
    ("Columbus", "OH"),
    ("Reno", "NV"),
];
const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];
const WEB_TLDS: &[&str] = &["com", "org", "net", "info", "io"];
const HANDLE_WORDS: &[&str] = &[
    "amber", "blaze", "comet", "drift", "ember", "frost", "glide", "haze", "ivy", "jolt", "kite",
    "lark", "moss", "nova", "onyx", "pixel", "quill", "raven", "sage", "tide", "umbra", "vale",
    "wren", "zest",
];
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const VIN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ0123456789";
const HEX_DIGITS: &[u8] = b"0123456789abcdef";

/// Built-in deterministic generator of synthetic identities.
///
/// Names and SSNs are unique across everything one instance has produced.
#[derive(Debug, Clone)]
pub struct PersonalDataGenerator {
    rng: DeterministicRng,
    issued_names: HashSet<String>,
    issued_ssns: HashSet<String>,
}

impl PersonalDataGenerator {
    /// Create a generator whose record sequence is fixed by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
            issued_names: HashSet::new(),
            issued_ssns: HashSet::new(),
        }
    }

    fn next_record(&mut self) -> PersonalData {
        let name = self.unique_name();
        let ssn = self.unique_ssn();
        let email = self.email_for(&name);

        let mut unique_identifiers = IdentifierMap::new();
        unique_identifiers.insert("name".to_string(), name);
        unique_identifiers.insert("ssn".to_string(), ssn);

        let attributes = tree([
            (
                "profile",
                node([
                    ("sex", pick(&mut self.rng, SEXES).into()),
                    ("blood_group", pick(&mut self.rng, BLOOD_GROUPS).into()),
                    ("date_of_birth", self.date_of_birth().into()),
                    ("photo", self.image_url().into()),
                ]),
            ),
            (
                "car",
                node([
                    ("license_plate", self.license_plate().into()),
                    ("vin", self.vin().into()),
                ]),
            ),
            (
                "bank_account",
                node([
                    ("bank_country", pick(&mut self.rng, BANK_COUNTRIES).into()),
                    ("bban", self.bban().into()),
                    ("aba", digits(&mut self.rng, 9).into()),
                    ("iban", self.iban().into()),
                    ("swift", self.swift().into()),
                    (
                        "credit_card",
                        node([
                            ("expire", self.card_expiry().into()),
                            ("number", self.card_number().into()),
                            ("provider", pick(&mut self.rng, CARD_PROVIDERS).into()),
                            ("security_code", digits(&mut self.rng, 3).into()),
                        ]),
                    ),
                ]),
            ),
            (
                "contacts",
                node([
                    ("phone", self.phone_number().into()),
                    ("email", email.into()),
                    ("website", self.website().into()),
                    ("telegram", self.user_name().into()),
                    (
                        "social_networks",
                        node([
                            ("vk", self.user_name().into()),
                            ("twitter", self.user_name().into()),
                            ("linkedin", self.user_name().into()),
                            ("facebook", self.user_name().into()),
                        ]),
                    ),
                ]),
            ),
            (
                "internet_access_point",
                node([
                    ("ipv4", self.ipv4().into()),
                    ("ipv6", self.ipv6().into()),
                    ("mac", self.mac_address().into()),
                ]),
            ),
            (
                "passports",
                node([
                    ("national_passport_number", self.passport_number().into()),
                    (
                        "international_passport_number",
                        self.passport_number().into(),
                    ),
                ]),
            ),
            (
                "work",
                node([
                    ("location", self.coordinates().into()),
                    ("company", self.company().into()),
                    ("address", self.address().into()),
                ]),
            ),
            (
                "home",
                node([
                    ("address", self.address().into()),
                    ("location", self.coordinates().into()),
                ]),
            ),
        ]);

        PersonalData {
            unique_identifiers,
            attributes,
        }
    }

    fn unique_name(&mut self) -> String {
        loop {
            let first = pick(&mut self.rng, FIRST_NAMES);
            let last = pick(&mut self.rng, LAST_NAMES);
            // Middle initials widen the name space once the plain pairs run low.
            let candidate = if self.issued_names.len() < FIRST_NAMES.len() * LAST_NAMES.len() / 4 {
                format!("{first} {last}")
            } else {
                let initial = UPPERCASE[self.rng.random_range(0..UPPERCASE.len())] as char;
                format!("{first} {initial}. {last}")
            };
            if self.issued_names.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn unique_ssn(&mut self) -> String {
        loop {
            let area = self.rng.random_range(1..=899u32);
            let group = self.rng.random_range(1..=99u32);
            let serial = self.rng.random_range(1..=9999u32);
            let candidate = format!("{area:03}-{group:02}-{serial:04}");
            if area != 666 && self.issued_ssns.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn email_for(&mut self, name: &str) -> String {
        let local = name
            .split_whitespace()
            .map(|part| part.trim_end_matches('.').to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(".");
        let suffix = self.rng.random_range(1..=999u32);
        format!("{local}{suffix}@{}", pick(&mut self.rng, EMAIL_DOMAINS))
    }

    fn date_of_birth(&mut self) -> String {
        let base = NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or_default();
        let offset = self.rng.random_range(0..(365 * 65 + 16));
        (base + Duration::days(offset)).format("%Y-%m-%d").to_string()
    }

    fn image_url(&mut self) -> String {
        let width = self.rng.random_range(2..=10u32) * 64;
        let height = self.rng.random_range(2..=10u32) * 64;
        format!("https://picsum.photos/{width}/{height}")
    }

    fn license_plate(&mut self) -> String {
        format!(
            "{}-{}",
            letters(&mut self.rng, 3),
            digits(&mut self.rng, 4)
        )
    }

    fn vin(&mut self) -> String {
        sample_chars(&mut self.rng, VIN_ALPHABET, 17)
    }

    fn bban(&mut self) -> String {
        format!("{}{}", letters(&mut self.rng, 4), digits(&mut self.rng, 14))
    }

    fn iban(&mut self) -> String {
        let country = pick(&mut self.rng, BANK_COUNTRIES);
        let check = self.rng.random_range(2..=98u32);
        format!("{country}{check:02}{}", self.bban())
    }

    fn swift(&mut self) -> String {
        format!(
            "{}{}{}",
            letters(&mut self.rng, 4),
            pick(&mut self.rng, BANK_COUNTRIES),
            letters(&mut self.rng, 2)
        )
    }

    fn card_expiry(&mut self) -> String {
        let month = self.rng.random_range(1..=12u32);
        let year = self.rng.random_range(26..=35u32);
        format!("{month:02}/{year:02}")
    }

    fn card_number(&mut self) -> String {
        let prefix = self.rng.random_range(3..=6u32);
        format!("{prefix}{}", digits(&mut self.rng, 15))
    }

    fn phone_number(&mut self) -> String {
        format!(
            "({}) {}-{}",
            self.rng.random_range(201..=989u32),
            self.rng.random_range(200..=999u32),
            digits(&mut self.rng, 4)
        )
    }

    fn website(&mut self) -> String {
        format!(
            "https://www.{}{}.{}/",
            pick(&mut self.rng, HANDLE_WORDS),
            pick(&mut self.rng, COMPANY_STEMS).to_ascii_lowercase(),
            pick(&mut self.rng, WEB_TLDS)
        )
    }

    fn user_name(&mut self) -> String {
        format!(
            "{}_{}{}",
            pick(&mut self.rng, HANDLE_WORDS),
            pick(&mut self.rng, HANDLE_WORDS),
            self.rng.random_range(1..=9999u32)
        )
    }

    fn ipv4(&mut self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.rng.random_range(1..=223u32),
            self.rng.random_range(0..=255u32),
            self.rng.random_range(0..=255u32),
            self.rng.random_range(1..=254u32)
        )
    }

    fn ipv6(&mut self) -> String {
        (0..8)
            .map(|_| format!("{:x}", self.rng.random_range(0..=0xffffu32)))
            .collect::<Vec<_>>()
            .join(":")
    }

    fn mac_address(&mut self) -> String {
        (0..6)
            .map(|_| sample_chars(&mut self.rng, HEX_DIGITS, 2))
            .collect::<Vec<_>>()
            .join(":")
    }

    fn passport_number(&mut self) -> String {
        format!("{}{}", letters(&mut self.rng, 1), digits(&mut self.rng, 8))
    }

    fn coordinates(&mut self) -> String {
        let latitude = self.rng.random_range(-90.0..=90.0f64);
        let longitude = self.rng.random_range(-180.0..=180.0f64);
        format!("({latitude:.6}, {longitude:.6})")
    }

    fn company(&mut self) -> String {
        format!(
            "{} {} {}",
            pick(&mut self.rng, COMPANY_STEMS),
            pick(&mut self.rng, COMPANY_STEMS),
            pick(&mut self.rng, COMPANY_SUFFIXES)
        )
    }

    fn address(&mut self) -> String {
        let number = self.rng.random_range(1..=9999u32);
        let street = pick(&mut self.rng, STREET_NAMES);
        let suffix = pick(&mut self.rng, STREET_SUFFIXES);
        let (city, state) = CITIES[self.rng.random_range(0..CITIES.len())];
        let zip = self.rng.random_range(10000..=99999u32);
        format!("{number} {street} {suffix}, {city}, {state} {zip}")
    }
}

impl RecordGenerator for PersonalDataGenerator {
    fn generate(&mut self, n: usize) -> Vec<PersonalData> {
        (0..n).map(|_| self.next_record()).collect()
    }
}

fn tree<const N: usize>(entries: [(&str, AttributeValue); N]) -> AttributeTree {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect::<IndexMap<_, _>>()
}

fn node<const N: usize>(entries: [(&str, AttributeValue); N]) -> AttributeValue {
    AttributeValue::Node(tree(entries))
}

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&'static str]) -> &'static str {
    options[rng.random_range(0..options.len())]
}

fn sample_chars<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

fn digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    sample_chars(rng, b"0123456789", len)
}

fn letters<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    sample_chars(rng, UPPERCASE, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::flatten;

    #[test]
    fn same_seed_yields_same_records() {
        let first = PersonalDataGenerator::new(7).generate(5);
        let second = PersonalDataGenerator::new(7).generate(5);
        assert_eq!(first, second);
        assert_ne!(first, PersonalDataGenerator::new(8).generate(5));
    }

    #[test]
    fn records_carry_name_and_ssn() {
        let records = PersonalDataGenerator::new(1).generate(3);
        for record in records {
            let keys: Vec<&str> = record
                .unique_identifiers
                .keys()
                .map(String::as_str)
                .collect();
            assert_eq!(keys, vec!["name", "ssn"]);
            let ssn = &record.unique_identifiers["ssn"];
            assert_eq!(ssn.len(), 11);
            assert_eq!(ssn.matches('-').count(), 2);
        }
    }

    #[test]
    fn identifiers_are_unique_within_a_generator() {
        let mut generator = PersonalDataGenerator::new(3);
        let mut records = generator.generate(400);
        records.extend(generator.generate(400));
        let names: HashSet<_> = records
            .iter()
            .map(|record| record.unique_identifiers["name"].clone())
            .collect();
        let ssns: HashSet<_> = records
            .iter()
            .map(|record| record.unique_identifiers["ssn"].clone())
            .collect();
        assert_eq!(names.len(), records.len());
        assert_eq!(ssns.len(), records.len());
    }

    #[test]
    fn attribute_leaves_are_table_safe_strings() {
        let records = PersonalDataGenerator::new(11).generate(20);
        for record in records {
            let flat = flatten(&record.attributes);
            assert_eq!(flat.len(), 33);
            for (key, value) in flat {
                assert!(!value.is_empty(), "{key} is empty");
                assert_eq!(value.trim(), value, "{key} is padded");
                assert!(!value.contains('|') && !value.contains('\n'), "{key}");
            }
        }
    }

    #[test]
    fn email_and_dates_follow_expected_shapes() {
        let record = PersonalDataGenerator::new(5).generate(1).remove(0);
        let flat = flatten(&record.attributes);
        assert!(flat["contacts__email"].contains('@'));
        assert!(NaiveDate::parse_from_str(&flat["profile__date_of_birth"], "%Y-%m-%d").is_ok());
        assert!(flat["work__location"].starts_with('('));
    }
}
