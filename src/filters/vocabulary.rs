//! Closed sets of filter values accepted by the provider.
//!
//! Every member maps to exactly one provider string and back. Decoding an
//! unrecognised provider string yields `None` so new provider values never
//! break a search.

use std::fmt;
use std::str::FromStr;

/// A closed filter dimension with a bijective provider-string mapping
pub trait Vocabulary: Sized + Copy + PartialEq + 'static {
    /// Human name of the dimension, used in logs and errors
    const DIMENSION: &'static str;

    /// Every member, in declaration order
    fn all() -> &'static [Self];

    /// Canonical symbolic name of the member
    fn name(&self) -> &'static str;

    /// Exact string the provider expects for this member
    fn as_provider_str(&self) -> &'static str;

    fn from_provider_str(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|member| member.as_provider_str() == value)
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|member| member.name() == name)
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $ty:ident ($dimension:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $ty {
            $($variant),+
        }

        impl Vocabulary for $ty {
            const DIMENSION: &'static str = $dimension;

            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            fn as_provider_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_provider_str())
            }
        }
    };
}

vocabulary! {
    /// Kind of rental unit
    PropertyType("type") {
        Apartment => "Apartment",
        Condo => "Condo",
        Loft => "Loft",
        House => "House",
        Townhouse => "Townhouse",
        Duplex => "Duplex",
        MainFloor => "Main Floor",
        Basement => "Basement",
        Shared => "Shared",
        Mobile => "Mobile",
        Acreage => "Acreage",
        OfficeSpace => "Office Space",
        ParkingSpot => "Parking Spot",
        Storage => "Storage",
        Vacation => "Vacation",
    }
}

vocabulary! {
    Beds("beds") {
        Bachelor => "bachelor",
        One => "1",
        OnePlusDen => "1 + Den",
        Two => "2",
        TwoPlusDen => "2 + Den",
        Three => "3",
        ThreePlusDen => "3 + Den",
        Four => "4",
        FourPlusDen => "4 + Den",
        Six => "6",
        Seven => "7",
        Eight => "8",
        Nine => "9",
    }
}

vocabulary! {
    Baths("baths") {
        One => "1",
        OneAndHalf => "1.5",
        Two => "2",
        TwoAndHalf => "2.5",
        ThreePlus => "3+",
    }
}

vocabulary! {
    /// Utilities included in the rent
    Utility("utilities_included") {
        Heat => "Heat",
        Electricity => "Electricity",
        Water => "Water",
        Cable => "Television",
        Internet => "Internet",
    }
}

vocabulary! {
    Furnishing("furnishing") {
        Unfurnished => "Unfurnished",
        Furnished => "Furnished",
    }
}

vocabulary! {
    Pets("pet") {
        Cats => "Cats",
        Dogs => "Dogs",
    }
}

vocabulary! {
    Smoking("smoking") {
        NonSmoking => "Non-Smoking",
        Smoking => "Smoking",
    }
}

vocabulary! {
    /// Parking options, sent to the provider as `garage_size`
    Parking("garage_size") {
        GarageSingle => "Garage Single",
        GarageDouble => "Garage Double",
        GarageTriple => "Garage Triple",
        Underground => "Underground",
        Covered => "Covered",
        Outdoor => "Outdoor",
    }
}

vocabulary! {
    HomeFeature("home_features") {
        RentToOwn => "Rent-to-Own",
        CornerUnit => "Corner Unit",
        PenthouseUnit => "Penthouse Unit",
        Dishwasher => "Dishwasher",
        LaundryInSuite => "Laundry - In Suite",
        LaundryCoinCard => "Laundry - Coin/Card",
        LaundryShared => "Laundry - Shared",
        AirConditioning => "Air Conditioning",
        Fireplace => "Fireplace",
        JettedTubJacuzzi => "Jetted Tub/Jacuzzi",
        HardwoodFloors => "Hardwood Floors",
        LaminateFloors => "Laminate Floors",
        TileFlooring => "Tile Flooring",
        LuxuryVinylPlankFlooring => "Luxury Vinyl Plank Flooring",
        Balcony => "Balcony",
        FencedBackyard => "Fenced Backyard",
        FirePit => "Fire-Pit",
        OceanViews => "Ocean views",
        CityViews => "City views",
        MountainViews => "Mountain views",
        RiverViews => "River Views",
        LakeAccess => "Lake Access",
        InSuiteStorage => "In-suite Storage",
        StorageLockers => "Storage Lockers",
        Elevator => "Elevator",
        ZeroStepEntrance => "Zero-Step Entrance",
        ExtraWideDoorways => "Extra-Wide Doorways",
        RollInShower => "Roll-in Shower",
        SwimmingPool => "Swimming Pool",
    }
}

vocabulary! {
    /// Month the unit becomes available
    Availability("availability") {
        Immediate => "Immediate",
        January => "January",
        February => "February",
        March => "March",
        April => "April",
        June => "June",
        July => "July",
        August => "August",
        September => "September",
        October => "October",
        November => "November",
        December => "December",
    }
}

/// Cities served by the provider, with their numeric `city_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CityId {
    #[default]
    Calgary,
    Airdrie,
    RedDeer,
    Edmonton,
    FortMcMurray,
    Regina,
    Saskatoon,
    Winnipeg,
    Toronto,
    Mississauga,
    Ottawa,
    Montreal,
    Fredericton,
    Halifax,
    Charlottetown,
    StJohns,
    Vancouver,
    Victoria,
    Kelowna,
}

impl CityId {
    pub const ALL: [CityId; 19] = [
        CityId::Calgary,
        CityId::Airdrie,
        CityId::RedDeer,
        CityId::Edmonton,
        CityId::FortMcMurray,
        CityId::Regina,
        CityId::Saskatoon,
        CityId::Winnipeg,
        CityId::Toronto,
        CityId::Mississauga,
        CityId::Ottawa,
        CityId::Montreal,
        CityId::Fredericton,
        CityId::Halifax,
        CityId::Charlottetown,
        CityId::StJohns,
        CityId::Vancouver,
        CityId::Victoria,
        CityId::Kelowna,
    ];

    /// Provider's numeric identifier for the city
    pub fn id(&self) -> u32 {
        match self {
            CityId::Calgary => 1,
            CityId::Airdrie => 8,
            CityId::RedDeer => 7458,
            CityId::Edmonton => 2,
            CityId::FortMcMurray => 3114,
            CityId::Regina => 3,
            CityId::Saskatoon => 4,
            CityId::Winnipeg => 5,
            CityId::Toronto => 7,
            CityId::Mississauga => 139,
            CityId::Ottawa => 149,
            CityId::Montreal => 10143,
            CityId::Fredericton => 3191,
            CityId::Halifax => 10140,
            CityId::Charlottetown => 1726,
            CityId::StJohns => 8740,
            CityId::Vancouver => 6,
            CityId::Victoria => 97,
            CityId::Kelowna => 4435,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CityId::Calgary => "Calgary",
            CityId::Airdrie => "Airdrie",
            CityId::RedDeer => "Red Deer",
            CityId::Edmonton => "Edmonton",
            CityId::FortMcMurray => "Fort McMurray",
            CityId::Regina => "Regina",
            CityId::Saskatoon => "Saskatoon",
            CityId::Winnipeg => "Winnipeg",
            CityId::Toronto => "Toronto",
            CityId::Mississauga => "Mississauga",
            CityId::Ottawa => "Ottawa",
            CityId::Montreal => "Montreal",
            CityId::Fredericton => "Fredericton",
            CityId::Halifax => "Halifax",
            CityId::Charlottetown => "Charlottetown",
            CityId::StJohns => "St. John's",
            CityId::Vancouver => "Vancouver",
            CityId::Victoria => "Victoria",
            CityId::Kelowna => "Kelowna",
        }
    }

    /// Look a city up by display name, ignoring case and punctuation
    /// (`"red deer"`, `"RED_DEER"` and `"red-deer"` all match)
    pub fn from_display_name(name: &str) -> Option<CityId> {
        let wanted = fold_city_name(name);
        CityId::ALL
            .into_iter()
            .find(|city| fold_city_name(city.display_name()) == wanted)
    }
}

fn fold_city_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CityId::from_display_name(s).ok_or_else(|| format!("unknown city `{}`", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_bijective<V: Vocabulary + std::fmt::Debug>() {
        let mut seen = HashSet::new();
        for member in V::all() {
            assert!(
                seen.insert(member.as_provider_str()),
                "duplicate provider string in {}",
                V::DIMENSION
            );
            assert_eq!(V::from_provider_str(member.as_provider_str()), Some(*member));
            assert_eq!(V::from_name(member.name()), Some(*member));
        }
    }

    #[test]
    fn test_every_vocabulary_round_trips() {
        assert_bijective::<PropertyType>();
        assert_bijective::<Beds>();
        assert_bijective::<Baths>();
        assert_bijective::<Utility>();
        assert_bijective::<Furnishing>();
        assert_bijective::<Pets>();
        assert_bijective::<Smoking>();
        assert_bijective::<Parking>();
        assert_bijective::<HomeFeature>();
        assert_bijective::<Availability>();
    }

    #[test]
    fn test_unknown_provider_string_is_none() {
        assert_eq!(PropertyType::from_provider_str("Castle"), None);
        assert_eq!(Beds::from_provider_str("5"), None);
        // Matching is exact
        assert_eq!(Furnishing::from_provider_str("furnished"), None);
    }

    #[test]
    fn test_provider_strings() {
        assert_eq!(Utility::Cable.as_provider_str(), "Television");
        assert_eq!(HomeFeature::LaundryInSuite.to_string(), "Laundry - In Suite");
        assert_eq!(Beds::OnePlusDen.as_provider_str(), "1 + Den");
        assert_eq!(Parking::DIMENSION, "garage_size");
    }

    #[test]
    fn test_city_lookup() {
        assert_eq!(CityId::Calgary.id(), 1);
        assert_eq!(CityId::RedDeer.id(), 7458);
        assert_eq!("red deer".parse::<CityId>(), Ok(CityId::RedDeer));
        assert_eq!("ST_JOHNS".parse::<CityId>(), Ok(CityId::StJohns));
        assert!("Atlantis".parse::<CityId>().is_err());

        for city in CityId::ALL {
            assert_eq!(CityId::from_display_name(city.display_name()), Some(city));
        }
    }
}
