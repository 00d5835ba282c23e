use serde::{Deserialize, Serialize};
use serde_repr::Serialize_repr;

use super::de::TypeCodeVisitor;

/// Integer-coded enumeration as sent by the service
///
/// `from_id` is total: a code outside the known set resolves to
/// [`TypeCode::UNKNOWN`], so a new category on the service side never
/// aborts a decode.
pub trait TypeCode: Sized + Copy + core::fmt::Debug {
    /// Name of the id member when the value is sent as an object
    const ID_FIELD: &'static str;
    /// Member used for codes outside the known set
    const UNKNOWN: Self;
    /// Divisor applied to a value sent as a bare number
    const BARE_SCALE: i64 = 1;

    /// Resolves a wire code, `None` if it is not known
    fn try_from_id(id: i64) -> Option<Self>;

    /// Wire code of this member
    fn id(self) -> u32;

    /// Resolves a wire code, falling back to [`TypeCode::UNKNOWN`]
    fn from_id(id: i64) -> Self {
        Self::try_from_id(id).unwrap_or(Self::UNKNOWN)
    }
}

/// * `CacheType.GeocacheTypeId`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr)]
#[repr(u32)]
pub enum GeocacheType {
    /// Code not known to this library
    Unknown = 0,
    Traditional = 2,
    Multi = 3,
    Virtual = 4,
    Letterbox = 5,
    Event = 6,
    /// "Unknown cache", puzzle or mystery
    Mystery = 8,
    ProjectApe = 9,
    Webcam = 11,
    Locationless = 12,
    /// Cache In Trash Out event
    Cito = 13,
    Earthcache = 137,
    MegaEvent = 453,
    GpsAdventuresExhibit = 1304,
    Wherigo = 1858,
    LostAndFoundEvent = 3653,
    GroundspeakHq = 3773,
    GroundspeakLostAndFoundCelebration = 3774,
    GroundspeakBlockParty = 4738,
    GigaEvent = 7005,
}

impl TypeCode for GeocacheType {
    const ID_FIELD: &'static str = "GeocacheTypeId";
    const UNKNOWN: Self = GeocacheType::Unknown;

    fn try_from_id(id: i64) -> Option<Self> {
        let ty = match id {
            2 => GeocacheType::Traditional,
            3 => GeocacheType::Multi,
            4 => GeocacheType::Virtual,
            5 => GeocacheType::Letterbox,
            6 => GeocacheType::Event,
            8 => GeocacheType::Mystery,
            9 => GeocacheType::ProjectApe,
            11 => GeocacheType::Webcam,
            12 => GeocacheType::Locationless,
            13 => GeocacheType::Cito,
            137 => GeocacheType::Earthcache,
            453 => GeocacheType::MegaEvent,
            1304 => GeocacheType::GpsAdventuresExhibit,
            1858 => GeocacheType::Wherigo,
            3653 => GeocacheType::LostAndFoundEvent,
            3773 => GeocacheType::GroundspeakHq,
            3774 => GeocacheType::GroundspeakLostAndFoundCelebration,
            4738 => GeocacheType::GroundspeakBlockParty,
            7005 => GeocacheType::GigaEvent,
            _ => return None,
        };
        Some(ty)
    }

    fn id(self) -> u32 {
        self as u32
    }
}

/// * `ContainerType.ContainerTypeId`
///
/// A `null` container decodes to [`ContainerType::NotChosen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr)]
#[repr(u32)]
pub enum ContainerType {
    #[default]
    NotChosen = 1,
    Micro = 2,
    Regular = 3,
    Large = 4,
    Virtual = 5,
    Other = 6,
    Small = 8,
}

impl TypeCode for ContainerType {
    const ID_FIELD: &'static str = "ContainerTypeId";
    const UNKNOWN: Self = ContainerType::NotChosen;

    fn try_from_id(id: i64) -> Option<Self> {
        let ty = match id {
            1 => ContainerType::NotChosen,
            2 => ContainerType::Micro,
            3 => ContainerType::Regular,
            4 => ContainerType::Large,
            5 => ContainerType::Virtual,
            6 => ContainerType::Other,
            8 => ContainerType::Small,
            _ => return None,
        };
        Some(ty)
    }

    fn id(self) -> u32 {
        self as u32
    }
}

/// * `MemberType.MemberTypeId`
///
/// Sent either as `{"MemberTypeId": 2}` or as a bare number ten times the
/// id (`20`). Only the bare form is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr)]
#[repr(u32)]
pub enum MemberType {
    Guest = 0,
    Basic = 1,
    Charter = 2,
    Premium = 3,
}

impl TypeCode for MemberType {
    const ID_FIELD: &'static str = "MemberTypeId";
    const UNKNOWN: Self = MemberType::Guest;
    const BARE_SCALE: i64 = 10;

    fn try_from_id(id: i64) -> Option<Self> {
        let ty = match id {
            0 => MemberType::Guest,
            1 => MemberType::Basic,
            2 => MemberType::Charter,
            3 => MemberType::Premium,
            _ => return None,
        };
        Some(ty)
    }

    fn id(self) -> u32 {
        self as u32
    }
}

/// * `LogType.WptLogTypeId` of a geocache log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr)]
#[repr(u32)]
pub enum CacheLogType {
    #[default]
    Unknown = 0,
    FoundIt = 2,
    DidntFindIt = 3,
    WriteNote = 4,
    Archive = 5,
    NeedsArchived = 7,
    WillAttend = 9,
    Attended = 10,
    WebcamPhotoTaken = 11,
    Unarchive = 12,
    TemporarilyDisableListing = 22,
    EnableListing = 23,
    PublishListing = 24,
    RetractListing = 25,
    NeedsMaintenance = 45,
    OwnerMaintenance = 46,
    UpdateCoordinates = 47,
    PostReviewerNote = 68,
    Announcement = 74,
}

impl TypeCode for CacheLogType {
    const ID_FIELD: &'static str = "WptLogTypeId";
    const UNKNOWN: Self = CacheLogType::Unknown;

    fn try_from_id(id: i64) -> Option<Self> {
        let ty = match id {
            2 => CacheLogType::FoundIt,
            3 => CacheLogType::DidntFindIt,
            4 => CacheLogType::WriteNote,
            5 => CacheLogType::Archive,
            7 => CacheLogType::NeedsArchived,
            9 => CacheLogType::WillAttend,
            10 => CacheLogType::Attended,
            11 => CacheLogType::WebcamPhotoTaken,
            12 => CacheLogType::Unarchive,
            22 => CacheLogType::TemporarilyDisableListing,
            23 => CacheLogType::EnableListing,
            24 => CacheLogType::PublishListing,
            25 => CacheLogType::RetractListing,
            45 => CacheLogType::NeedsMaintenance,
            46 => CacheLogType::OwnerMaintenance,
            47 => CacheLogType::UpdateCoordinates,
            68 => CacheLogType::PostReviewerNote,
            74 => CacheLogType::Announcement,
            _ => return None,
        };
        Some(ty)
    }

    fn id(self) -> u32 {
        self as u32
    }
}

/// * `LogType.WptLogTypeId` of a trackable log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr)]
#[repr(u32)]
pub enum TrackableLogType {
    Unknown = 0,
    WriteNote = 4,
    RetrieveItFromCache = 13,
    DroppedOff = 14,
    Transfer = 15,
    MarkMissing = 16,
    GrabItFromElsewhere = 19,
    DiscoveredIt = 48,
    MoveToCollection = 69,
    MoveToInventory = 70,
    Visited = 75,
}

impl TypeCode for TrackableLogType {
    const ID_FIELD: &'static str = "WptLogTypeId";
    const UNKNOWN: Self = TrackableLogType::Unknown;

    fn try_from_id(id: i64) -> Option<Self> {
        let ty = match id {
            4 => TrackableLogType::WriteNote,
            13 => TrackableLogType::RetrieveItFromCache,
            14 => TrackableLogType::DroppedOff,
            15 => TrackableLogType::Transfer,
            16 => TrackableLogType::MarkMissing,
            19 => TrackableLogType::GrabItFromElsewhere,
            48 => TrackableLogType::DiscoveredIt,
            69 => TrackableLogType::MoveToCollection,
            70 => TrackableLogType::MoveToInventory,
            75 => TrackableLogType::Visited,
            _ => return None,
        };
        Some(ty)
    }

    fn id(self) -> u32 {
        self as u32
    }
}

/// * `Waypoint.WptTypeID`
///
/// Codes outside the known set fall back to a reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr)]
#[repr(u32)]
pub enum WaypointType {
    ParkingArea = 217,
    VirtualStage = 218,
    PhysicalStage = 219,
    FinalLocation = 220,
    Trailhead = 221,
    #[default]
    ReferencePoint = 452,
}

impl WaypointType {
    /// Icon name used by the geocaching.com website for this type
    pub fn icon_name(self) -> &'static str {
        match self {
            WaypointType::ParkingArea => "pkg",
            WaypointType::VirtualStage => "puzzle",
            WaypointType::PhysicalStage => "stage",
            WaypointType::FinalLocation => "flag",
            WaypointType::Trailhead => "trailhead",
            WaypointType::ReferencePoint => "waypoint",
        }
    }
}

impl TypeCode for WaypointType {
    const ID_FIELD: &'static str = "WptTypeID";
    const UNKNOWN: Self = WaypointType::ReferencePoint;

    fn try_from_id(id: i64) -> Option<Self> {
        let ty = match id {
            217 => WaypointType::ParkingArea,
            218 => WaypointType::VirtualStage,
            219 => WaypointType::PhysicalStage,
            220 => WaypointType::FinalLocation,
            221 => WaypointType::Trailhead,
            452 => WaypointType::ReferencePoint,
            _ => return None,
        };
        Some(ty)
    }

    fn id(self) -> u32 {
        self as u32
    }
}

macro_rules! deserialize_type_code {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    deserializer.deserialize_any(TypeCodeVisitor::<$ty>::new())
                }
            }
        )*
    };
}

deserialize_type_code!(
    GeocacheType,
    ContainerType,
    MemberType,
    CacheLogType,
    TrackableLogType,
    WaypointType,
);

bitflags::bitflags! {
    /// Set of geocache attributes that are switched on
    ///
    /// Each attribute is the bit at its `AttributeTypeID`.
    /// * [Attribute ids](https://www.geocaching.com/about/icons.aspx)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u128 {
        const DOGS = 1 << 1;
        const ACCESS_OR_PARKING_FEE = 1 << 2;
        const CLIMBING_GEAR = 1 << 3;
        const BOAT = 1 << 4;
        const SCUBA_GEAR = 1 << 5;
        const RECOMMENDED_FOR_KIDS = 1 << 6;
        const TAKES_LESS_THAN_AN_HOUR = 1 << 7;
        const SCENIC_VIEW = 1 << 8;
        const SIGNIFICANT_HIKE = 1 << 9;
        const DIFFICULT_CLIMBING = 1 << 10;
        const MAY_REQUIRE_WADING = 1 << 11;
        const MAY_REQUIRE_SWIMMING = 1 << 12;
        const AVAILABLE_AT_ALL_TIMES = 1 << 13;
        const RECOMMENDED_AT_NIGHT = 1 << 14;
        const AVAILABLE_DURING_WINTER = 1 << 15;
        const POISON_PLANTS = 1 << 17;
        const DANGEROUS_ANIMALS = 1 << 18;
        const TICKS = 1 << 19;
        const ABANDONED_MINES = 1 << 20;
        const CLIFF_FALLING_ROCKS = 1 << 21;
        const HUNTING = 1 << 22;
        const DANGEROUS_AREA = 1 << 23;
        const WHEELCHAIR_ACCESSIBLE = 1 << 24;
        const PARKING_AVAILABLE = 1 << 25;
        const PUBLIC_TRANSPORTATION = 1 << 26;
        const DRINKING_WATER = 1 << 27;
        const PUBLIC_RESTROOMS = 1 << 28;
        const TELEPHONE = 1 << 29;
        const PICNIC_TABLES = 1 << 30;
        const CAMPING_AVAILABLE = 1 << 31;
        const BICYCLES = 1 << 32;
        const MOTORCYCLES = 1 << 33;
        const QUADS = 1 << 34;
        const OFF_ROAD_VEHICLES = 1 << 35;
        const SNOWMOBILES = 1 << 36;
        const HORSES = 1 << 37;
        const CAMPFIRES = 1 << 38;
        const THORNS = 1 << 39;
        const STEALTH_REQUIRED = 1 << 40;
        const STROLLER_ACCESSIBLE = 1 << 41;
        const NEEDS_MAINTENANCE = 1 << 42;
        const WATCH_FOR_LIVESTOCK = 1 << 43;
        const FLASHLIGHT_REQUIRED = 1 << 44;
        const LOST_AND_FOUND_TOUR = 1 << 45;
        const TRUCK_DRIVER_RV = 1 << 46;
        const FIELD_PUZZLE = 1 << 47;
        const UV_LIGHT_REQUIRED = 1 << 48;
        const SNOWSHOES = 1 << 49;
        const CROSS_COUNTRY_SKIS = 1 << 50;
        const SPECIAL_TOOL_REQUIRED = 1 << 51;
        const NIGHT_CACHE = 1 << 52;
        const PARK_AND_GRAB = 1 << 53;
        const ABANDONED_STRUCTURE = 1 << 54;
        const SHORT_HIKE = 1 << 55;
        const MEDIUM_HIKE = 1 << 56;
        const LONG_HIKE = 1 << 57;
        const FUEL_NEARBY = 1 << 58;
        const FOOD_NEARBY = 1 << 59;
        const WIRELESS_BEACON = 1 << 60;
        const PARTNERSHIP_CACHE = 1 << 61;
        const SEASONAL_ACCESS = 1 << 62;
        const TOURIST_FRIENDLY = 1 << 63;
        const TREE_CLIMBING = 1 << 64;
        const FRONT_YARD = 1 << 65;
        const TEAMWORK_REQUIRED = 1 << 66;
        const GEOTOUR = 1 << 67;
    }
}

impl Attributes {
    /// Resolves an `AttributeTypeID`, `None` if the id is not known
    pub fn from_id(id: i64) -> Option<Attributes> {
        if !(0..128).contains(&id) {
            return None;
        }
        Attributes::from_bits(1u128 << id)
    }

    /// `AttributeTypeID`s of all attributes in the set, ascending
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().map(|attr| attr.bits().trailing_zeros())
    }
}

/// WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }
}
