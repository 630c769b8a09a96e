/// Country codes with bulk address lists, and their display names.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("ALL", "🌐 All Countries"),
    ("AE", "🇦🇪 UAE"),
    ("AL", "🇦🇱 Albania"),
    ("AM", "🇦🇲 Armenia"),
    ("AR", "🇦🇷 Argentina"),
    ("AT", "🇦🇹 Austria"),
    ("AU", "🇦🇺 Australia"),
    ("AZ", "🇦🇿 Azerbaijan"),
    ("BE", "🇧🇪 Belgium"),
    ("BG", "🇧🇬 Bulgaria"),
    ("BR", "🇧🇷 Brazil"),
    ("CA", "🇨🇦 Canada"),
    ("CH", "🇨🇭 Switzerland"),
    ("CN", "🇨🇳 China"),
    ("CO", "🇨🇴 Colombia"),
    ("CY", "🇨🇾 Cyprus"),
    ("CZ", "🇨🇿 Czechia"),
    ("DE", "🇩🇪 Germany"),
    ("DK", "🇩🇰 Denmark"),
    ("EE", "🇪🇪 Estonia"),
    ("ES", "🇪🇸 Spain"),
    ("FI", "🇫🇮 Finland"),
    ("FR", "🇫🇷 France"),
    ("GB", "🇬🇧 UK"),
    ("GI", "🇬🇮 Gibraltar"),
    ("HK", "🇭🇰 Hong Kong"),
    ("HU", "🇭🇺 Hungary"),
    ("ID", "🇮🇩 Indonesia"),
    ("IE", "🇮🇪 Ireland"),
    ("IL", "🇮🇱 Israel"),
    ("IN", "🇮🇳 India"),
    ("IR", "🇮🇷 Iran"),
    ("IT", "🇮🇹 Italy"),
    ("JP", "🇯🇵 Japan"),
    ("KR", "🇰🇷 South Korea"),
    ("KZ", "🇰🇿 Kazakhstan"),
    ("LT", "🇱🇹 Lithuania"),
    ("LU", "🇱🇺 Luxembourg"),
    ("LV", "🇱🇻 Latvia"),
    ("MD", "🇲🇩 Moldova"),
    ("MX", "🇲🇽 Mexico"),
    ("MY", "🇲🇾 Malaysia"),
    ("NL", "🇳🇱 Netherlands"),
    ("NZ", "🇳🇿 New Zealand"),
    ("PH", "🇵🇭 Philippines"),
    ("PL", "🇵🇱 Poland"),
    ("PR", "🇵🇷 Puerto Rico"),
    ("PT", "🇵🇹 Portugal"),
    ("QA", "🇶🇦 Qatar"),
    ("RO", "🇷🇴 Romania"),
    ("RS", "🇷🇸 Serbia"),
    ("RU", "🇷🇺 Russia"),
    ("SA", "🇸🇦 Saudi Arabia"),
    ("SC", "🇸🇨 Seychelles"),
    ("SE", "🇸🇪 Sweden"),
    ("SG", "🇸🇬 Singapore"),
    ("SK", "🇸🇰 Slovakia"),
    ("TH", "🇹🇭 Thailand"),
    ("TR", "🇹🇷 Turkey"),
    ("TW", "🇹🇼 Taiwan"),
    ("UA", "🇺🇦 Ukraine"),
    ("US", "🇺🇸 USA"),
    ("UZ", "🇺🇿 Uzbekistan"),
    ("VN", "🇻🇳 Vietnam"),
];

/// Code of the combined list covering every country.
pub const ALL_COUNTRIES: &str = "ALL";

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code.trim()))
        .map(|(_, name)| *name)
}
