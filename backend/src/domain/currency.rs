/// Symbol shown next to amounts; unknown codes get none
pub fn currency_sign(code: &str) -> &'static str {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "€",
        "INR" => "₹",
        _ => "",
    }
}
