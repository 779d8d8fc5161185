//! Forecast prefectures and their JMA area codes.
//!
//! Forecasts are published per prefecture office. Stations are associated
//! with a prefecture through the regional block number at the start of
//! their code.

use serde::Serialize;

use super::StationCode;

/// A prefecture for which JMA publishes a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Prefecture {
    /// Lowercase romanised key used by callers (e.g. `"tokyo"`).
    pub key: &'static str,
    /// Six-digit JMA forecast area code (e.g. `"130000"`).
    pub area_code: &'static str,
    /// Japanese name.
    pub name: &'static str,
}

const fn pref(key: &'static str, area_code: &'static str, name: &'static str) -> Prefecture {
    Prefecture {
        key,
        area_code,
        name,
    }
}

/// All prefectures, in area code order.
static PREFECTURES: [Prefecture; 47] = [
    pref("hokkaido_sapporo", "016000", "北海道"),
    pref("aomori", "020000", "青森県"),
    pref("iwate", "030000", "岩手県"),
    pref("miyagi", "040000", "宮城県"),
    pref("akita", "050000", "秋田県"),
    pref("yamagata", "060000", "山形県"),
    pref("fukushima", "070000", "福島県"),
    pref("ibaraki", "080000", "茨城県"),
    pref("tochigi", "090000", "栃木県"),
    pref("gunma", "100000", "群馬県"),
    pref("saitama", "110000", "埼玉県"),
    pref("chiba", "120000", "千葉県"),
    pref("tokyo", "130000", "東京都"),
    pref("kanagawa", "140000", "神奈川県"),
    pref("niigata", "150000", "新潟県"),
    pref("toyama", "160000", "富山県"),
    pref("ishikawa", "170000", "石川県"),
    pref("fukui", "180000", "福井県"),
    pref("yamanashi", "190000", "山梨県"),
    pref("nagano", "200000", "長野県"),
    pref("gifu", "210000", "岐阜県"),
    pref("shizuoka", "220000", "静岡県"),
    pref("aichi", "230000", "愛知県"),
    pref("mie", "240000", "三重県"),
    pref("shiga", "250000", "滋賀県"),
    pref("kyoto", "260000", "京都府"),
    pref("osaka", "270000", "大阪府"),
    pref("hyogo", "280000", "兵庫県"),
    pref("nara", "290000", "奈良県"),
    pref("wakayama", "300000", "和歌山県"),
    pref("tottori", "310000", "鳥取県"),
    pref("shimane", "320000", "島根県"),
    pref("okayama", "330000", "岡山県"),
    pref("hiroshima", "340000", "広島県"),
    pref("yamaguchi", "350000", "山口県"),
    pref("tokushima", "360000", "徳島県"),
    pref("kagawa", "370000", "香川県"),
    pref("ehime", "380000", "愛媛県"),
    pref("kochi", "390000", "高知県"),
    pref("fukuoka", "400000", "福岡県"),
    pref("saga", "410000", "佐賀県"),
    pref("nagasaki", "420000", "長崎県"),
    pref("kumamoto", "430000", "熊本県"),
    pref("oita", "440000", "大分県"),
    pref("miyazaki", "450000", "宮崎県"),
    pref("kagoshima", "460000", "鹿児島県"),
    pref("okinawa", "470000", "沖縄県"),
];

impl Prefecture {
    /// All known prefectures, in area code order.
    pub fn all() -> &'static [Prefecture] {
        &PREFECTURES
    }

    /// Look up a prefecture by key. Matching ignores case and surrounding
    /// whitespace.
    pub fn by_key(key: &str) -> Option<&'static Prefecture> {
        let key = key.trim();
        PREFECTURES.iter().find(|p| p.key.eq_ignore_ascii_case(key))
    }

    /// Prefecture for a JMA regional block number.
    pub fn for_block(block: u8) -> Option<&'static Prefecture> {
        let key = match block {
            11..=24 => "hokkaido_sapporo",
            31 => "aomori",
            32 => "akita",
            33 => "iwate",
            34 => "miyagi",
            35 => "yamagata",
            36 => "fukushima",
            40 => "ibaraki",
            41 => "tochigi",
            42 => "gunma",
            43 => "saitama",
            44 => "tokyo",
            45 => "chiba",
            46 => "kanagawa",
            48 => "nagano",
            49 => "yamanashi",
            50 => "shizuoka",
            51 => "aichi",
            52 => "gifu",
            53 => "mie",
            54 => "niigata",
            55 => "toyama",
            56 => "ishikawa",
            57 => "fukui",
            60 => "shiga",
            61 => "kyoto",
            62 => "osaka",
            63 => "hyogo",
            64 => "nara",
            65 => "wakayama",
            66 => "okayama",
            67 => "hiroshima",
            68 => "shimane",
            69 => "tottori",
            71 => "tokushima",
            72 => "kagawa",
            73 => "ehime",
            74 => "kochi",
            81 => "yamaguchi",
            82 => "fukuoka",
            83 => "oita",
            84 => "nagasaki",
            85 => "saga",
            86 => "kumamoto",
            87 => "miyazaki",
            88 => "kagoshima",
            91..=94 => "okinawa",
            _ => return None,
        };
        Self::by_key(key)
    }

    /// Prefecture a station belongs to, derived from its block number.
    pub fn for_station(code: StationCode) -> Option<&'static Prefecture> {
        Self::for_block(code.block())
    }
}
