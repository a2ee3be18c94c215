//! Store-side value objects

use std::fmt;

use crate::errors::{DomainError, DomainResult};

object_id_value_object!(
    /// Store identifier: 24 lowercase hex characters assigned by the backing store
    StoreId,
    field = "store_id"
);

/// Display name of a store; required and trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Name(String);

impl Name {
    pub fn new(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::required("name"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.0.trim().is_empty() {
            Err(DomainError::required("name"))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

text_value_object!(
    /// Branch label such as "新宿店"
    BranchName,
    field = "branch_name"
);

enum_value_object!(
    /// One of the 47 Japanese prefectures
    Prefecture,
    field = "prefecture",
    values = [
        HOKKAIDO => "北海道",
        AOMORI => "青森県",
        IWATE => "岩手県",
        MIYAGI => "宮城県",
        AKITA => "秋田県",
        YAMAGATA => "山形県",
        FUKUSHIMA => "福島県",
        IBARAKI => "茨城県",
        TOCHIGI => "栃木県",
        GUNMA => "群馬県",
        SAITAMA => "埼玉県",
        CHIBA => "千葉県",
        TOKYO => "東京都",
        KANAGAWA => "神奈川県",
        NIIGATA => "新潟県",
        TOYAMA => "富山県",
        ISHIKAWA => "石川県",
        FUKUI => "福井県",
        YAMANASHI => "山梨県",
        NAGANO => "長野県",
        GIFU => "岐阜県",
        SHIZUOKA => "静岡県",
        AICHI => "愛知県",
        MIE => "三重県",
        SHIGA => "滋賀県",
        KYOTO => "京都府",
        OSAKA => "大阪府",
        HYOGO => "兵庫県",
        NARA => "奈良県",
        WAKAYAMA => "和歌山県",
        TOTTORI => "鳥取県",
        SHIMANE => "島根県",
        OKAYAMA => "岡山県",
        HIROSHIMA => "広島県",
        YAMAGUCHI => "山口県",
        TOKUSHIMA => "徳島県",
        KAGAWA => "香川県",
        EHIME => "愛媛県",
        KOCHI => "高知県",
        FUKUOKA => "福岡県",
        SAGA => "佐賀県",
        NAGASAKI => "長崎県",
        KUMAMOTO => "熊本県",
        OITA => "大分県",
        MIYAZAKI => "宮崎県",
        KAGOSHIMA => "鹿児島県",
        OKINAWA => "沖縄県",
    ]
);

enum_value_object!(
    /// Entertainment district
    Area,
    field = "area",
    values = [
        YOSHIWARA => "吉原",
        SUSUKINO => "すすきの",
        NAKASU => "中洲",
        KABUKICHO => "歌舞伎町",
        FUKUHARA => "福原",
        KAWASAKI_HORINOUCHI => "川崎堀之内",
        UMEDA => "梅田",
        KINSAN => "錦三",
    ]
);

enum_value_object!(
    /// Store concept
    Genre,
    field = "genre",
    values = [
        MATURE => "熟女",
        SCHOOL => "学園系",
        STANDARD => "スタンダード",
        BUDGET => "格安店",
        LUXURY => "高級店",
    ]
);

enum_value_object!(
    /// Business category
    Industry,
    field = "industry",
    values = [
        DELIVERY_HEALTH => "デリヘル",
        HOTEL_HEALTH => "ホテヘル",
        STORE_HEALTH => "箱ヘル",
        SOAPLAND => "ソープ",
        DC => "DC",
        FUU_ESTHE => "風エス",
        MENS_ESTHE => "メンエス",
    ]
);

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Opening hours as minute offsets from midnight of the opening day
///
/// A close time at or before the open time is read as the next day, so
/// `22:00`-`05:00` spans seven hours and `10:00`-`10:00` a full day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusinessHours {
    open: u32,
    close: u32,
}

impl BusinessHours {
    pub fn new(open: &str, close: &str) -> DomainResult<Self> {
        let open = parse_clock(open)?;
        let mut close = parse_clock(close)?;
        if close <= open {
            close += MINUTES_PER_DAY;
        }
        let hours = Self { open, close };
        hours.validate()?;
        Ok(hours)
    }

    /// Opening offset in minutes
    pub fn open_minutes(&self) -> u32 {
        self.open
    }

    /// Closing offset in minutes; may exceed one day for overnight spans
    pub fn close_minutes(&self) -> u32 {
        self.close
    }

    pub fn open_string(&self) -> String {
        format_clock(self.open)
    }

    pub fn close_string(&self) -> String {
        format_clock(self.close)
    }

    pub fn is_overnight(&self) -> bool {
        self.close > MINUTES_PER_DAY
    }

    pub fn is_zero(&self) -> bool {
        self.open == 0 && self.close == 0
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.close <= self.open || self.close - self.open > MINUTES_PER_DAY {
            return Err(DomainError::invalid(
                "business_hours",
                "span must be longer than zero and at most 24 hours",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for BusinessHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.open_string(), self.close_string())
    }
}

fn parse_clock(raw: &str) -> DomainResult<u32> {
    let trimmed = raw.trim();
    let bad = || DomainError::format("business_hours", format!("expected H:MM or HH:MM, got {trimmed:?}"));
    let (hour, minute) = trimmed.split_once(':').ok_or_else(bad)?;
    if !(1..=2).contains(&hour.len()) || minute.len() != 2 {
        return Err(bad());
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let hour: u32 = hour.parse().map_err(|_| bad())?;
    let minute: u32 = minute.parse().map_err(|_| bad())?;
    if hour > 23 || minute > 59 {
        return Err(bad());
    }
    Ok(hour * 60 + minute)
}

fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

rating_value_object!(
    /// Aggregate rating shown on the store card; zero means unrated
    AverageRating,
    field = "average_rating"
);

/// Hourly rate offered to cast members, in yen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnitPrice(i32);

impl UnitPrice {
    pub const MIN: i32 = 1_000;
    pub const MAX: i32 = 100_000;

    pub fn new(value: i32) -> DomainResult<Self> {
        let price = Self(value);
        price.validate()?;
        Ok(price)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn validate(&self) -> DomainResult<()> {
        if (Self::MIN..=Self::MAX).contains(&self.0) {
            Ok(())
        } else {
            Err(DomainError::out_of_range(
                "unit_price",
                format!("must be between {} and {}", Self::MIN, Self::MAX),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_store_id_normalizes_case() {
        let id = StoreId::parse("65A1B2C3D4E5F60718293A4B").unwrap();
        assert_eq!(id.value(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_store_id_rejects_bad_shapes() {
        assert_eq!(StoreId::parse("").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(
            StoreId::parse("65a1b2c3d4e5f60718293a4").unwrap_err().kind(),
            ErrorKind::Format
        );
        assert_eq!(
            StoreId::parse("65a1b2c3d4e5f60718293a4bc").unwrap_err().kind(),
            ErrorKind::Format
        );
        assert_eq!(
            StoreId::parse("zza1b2c3d4e5f60718293a4b").unwrap_err().kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn test_name_required() {
        assert!(Name::new("   ").is_err());
        assert_eq!(Name::new("  Club A ").unwrap().value(), "Club A");
    }

    #[test]
    fn test_enum_membership() {
        assert_eq!(Prefecture::new(" 東京都 ").unwrap(), Prefecture::TOKYO);
        assert_eq!(Prefecture::ALLOWED.len(), 47);
        assert_eq!(Area::ALLOWED.len(), 8);
        assert_eq!(Genre::ALLOWED.len(), 5);
        assert_eq!(Industry::ALLOWED.len(), 7);
        assert!(matches!(Area::new("渋谷"), Err(DomainError::InvalidValue { .. })));
        assert!(matches!(Industry::new(""), Err(DomainError::Required { .. })));
    }

    #[test]
    fn test_business_hours_same_day() {
        let hours = BusinessHours::new("10:00", "22:30").unwrap();
        assert_eq!(hours.open_string(), "10:00");
        assert_eq!(hours.close_string(), "22:30");
        assert!(!hours.is_overnight());
    }

    #[test]
    fn test_business_hours_overnight() {
        let hours = BusinessHours::new("22:00", "05:00").unwrap();
        assert_eq!(hours.close_minutes() - hours.open_minutes(), 7 * 60);
        assert_eq!(hours.close_string(), "05:00");
        assert!(hours.is_overnight());
    }

    #[test]
    fn test_business_hours_equal_is_full_day() {
        let hours = BusinessHours::new("10:00", "10:00").unwrap();
        assert_eq!(hours.close_minutes() - hours.open_minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_business_hours_single_digit_hour() {
        let hours = BusinessHours::new("9:00", "17:30").unwrap();
        assert_eq!(hours.open_minutes(), 9 * 60);
        assert_eq!(hours.open_string(), "09:00");
        assert_eq!(BusinessHours::new("22:00", "5:00").unwrap(), BusinessHours::new("22:00", "05:00").unwrap());
    }

    #[test]
    fn test_business_hours_rejects_garbage() {
        assert!(BusinessHours::new("25:00", "05:00").is_err());
        assert!(BusinessHours::new("9:0", "17:00").is_err());
        assert!(BusinessHours::new("009:00", "17:00").is_err());
        assert!(BusinessHours::new("+9:00", "17:00").is_err());
        assert!(BusinessHours::new("", "17:00").is_err());
        assert!(BusinessHours::default().validate().is_err());
    }

    #[test]
    fn test_average_rating_rounding() {
        assert_eq!(AverageRating::new(3.14).unwrap().value(), 3.1);
        assert_eq!(AverageRating::new(4.96).unwrap().value(), 5.0);
        assert!(AverageRating::new(-0.1).is_err());
        assert!(AverageRating::new(5.1).is_err());
        assert!(AverageRating::new(f64::NAN).is_err());
    }

    #[test]
    fn test_unit_price_bounds() {
        assert!(UnitPrice::new(999).is_err());
        assert_eq!(UnitPrice::new(1_000).unwrap().value(), 1_000);
        assert_eq!(UnitPrice::new(100_000).unwrap().value(), 100_000);
        assert!(UnitPrice::new(100_001).is_err());
    }
}
