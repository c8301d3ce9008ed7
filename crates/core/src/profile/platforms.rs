//! Per-platform profile payloads and their extraction rules.
//!
//! Each struct carries only the fields extraction needs, named as the
//! platform's API names them. Every field is optional and degrades on its
//! own: a missing, `null` or badly typed field reads as absent (numbers are
//! kept as text), its siblings are kept, and extraction substitutes empty
//! strings for whatever is absent.

use serde::{Deserialize, Serialize};

use super::ProfileSource;
use crate::lenient;
use crate::text::{title_case, upper_case};

/// Etsy `getUser` profile with its shops and registered addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtsyProfile {
    #[serde(rename = "Shops", default, deserialize_with = "lenient::list")]
    pub shops: Vec<EtsyShop>,
    #[serde(rename = "Addresses", default, deserialize_with = "lenient::list")]
    pub addresses: Vec<EtsyAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtsyShop {
    #[serde(default, deserialize_with = "lenient::string")]
    pub shop_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtsyAddress {
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_line: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub second_line: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub zip: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub country_name: Option<String>,
}

impl ProfileSource for EtsyProfile {
    fn business_name(&self) -> Option<String> {
        self.shops
            .first()
            .map(|shop| shop.shop_name.clone().unwrap_or_default())
    }

    fn address(&self) -> Option<String> {
        let address = self.addresses.first()?;

        let mut lines = vec![title_case(address.first_line.as_deref())];
        if let Some(second) = address.second_line.as_deref().filter(|s| !s.is_empty()) {
            lines.push(title_case(Some(second)));
        }
        lines.push(title_case(address.city.as_deref()));
        lines.push(format!(
            "{} {}",
            title_case(address.state.as_deref()),
            upper_case(address.zip.as_deref())
        ));
        lines.push(title_case(address.country_name.as_deref()));

        Some(format!("<p>{}</p>", lines.join("<br/>")))
    }
}

/// Shopify shop resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopifyProfile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address1: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub province_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub zip: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub country: Option<String>,
}

impl ProfileSource for ShopifyProfile {
    fn business_name(&self) -> Option<String> {
        Some(self.name.clone().unwrap_or_default())
    }

    fn address(&self) -> Option<String> {
        Some(format!(
            "<p>{}<br/>{}, {} {}<br/>{}</p>",
            self.address1.as_deref().unwrap_or_default(),
            self.city.as_deref().unwrap_or_default(),
            self.province_code.as_deref().unwrap_or_default(),
            self.zip.as_deref().unwrap_or_default(),
            self.country.as_deref().unwrap_or_default(),
        ))
    }
}

/// BigCommerce store information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigCommerceProfile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    /// Multi-line postal address as free text.
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: Option<String>,
}

impl ProfileSource for BigCommerceProfile {
    fn business_name(&self) -> Option<String> {
        Some(self.name.clone().unwrap_or_default())
    }

    fn address(&self) -> Option<String> {
        Some(
            self.address
                .as_deref()
                .unwrap_or_default()
                .replace('\n', "<br/>"),
        )
    }
}

/// A profile that only names the store (Tictail, NowInStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedProfile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
}

impl ProfileSource for NamedProfile {
    fn business_name(&self) -> Option<String> {
        Some(self.name.clone().unwrap_or_default())
    }

    fn address(&self) -> Option<String> {
        None
    }
}

/// Ecwid store profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcwidProfile {
    #[serde(default, deserialize_with = "lenient::object")]
    pub company: EcwidCompany,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcwidCompany {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state_or_province_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub country_code: Option<String>,
}

impl ProfileSource for EcwidProfile {
    fn business_name(&self) -> Option<String> {
        Some(self.company.company_name.clone().unwrap_or_default())
    }

    fn address(&self) -> Option<String> {
        Some(format!(
            "<p>{} {}<br/>{}</p>",
            title_case(self.company.state_or_province_code.as_deref()),
            upper_case(self.company.postal_code.as_deref()),
            title_case(self.company.country_code.as_deref()),
        ))
    }
}

/// Magento merchant profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagentoProfile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_name: Option<String>,
    /// Preformatted address, used as-is.
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: Option<String>,
}

impl ProfileSource for MagentoProfile {
    fn business_name(&self) -> Option<String> {
        Some(self.business_name.clone().unwrap_or_default())
    }

    fn address(&self) -> Option<String> {
        Some(self.address.clone().unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_etsy_first_shop_and_address() {
        let profile: EtsyProfile = serde_json::from_value(json!({
            "Shops": [{ "shop_name": "Foo" }, { "shop_name": "Ignored" }],
            "Addresses": [{
                "first_line": "12 main STREET",
                "second_line": "unit 4",
                "city": "new york",
                "state": "ny",
                "zip": "10001-abc",
                "country_name": "united states"
            }]
        }))
        .unwrap();

        assert_eq!(profile.business_name().as_deref(), Some("Foo"));
        assert_eq!(
            profile.address().as_deref(),
            Some("<p>12 Main Street<br/>Unit 4<br/>New York<br/>Ny 10001-ABC<br/>United States</p>")
        );
    }

    #[test]
    fn test_etsy_without_shops_or_addresses_contributes_nothing() {
        let profile = EtsyProfile::default();
        assert_eq!(profile.business_name(), None);
        assert_eq!(profile.address(), None);
    }

    #[test]
    fn test_etsy_partial_address_degrades_to_empty_fields() {
        let profile: EtsyProfile = serde_json::from_value(json!({
            "Addresses": [{ "city": "paris" }]
        }))
        .unwrap();
        assert_eq!(
            profile.address().as_deref(),
            Some("<p><br/>Paris<br/> <br/></p>")
        );
    }

    #[test]
    fn test_shopify_address_block() {
        let profile: ShopifyProfile = serde_json::from_value(json!({
            "name": "Bar",
            "address1": "1 Infinite Loop",
            "city": "Cupertino",
            "province_code": "CA",
            "zip": "95014",
            "country": "US"
        }))
        .unwrap();
        assert_eq!(profile.business_name().as_deref(), Some("Bar"));
        assert_eq!(
            profile.address().as_deref(),
            Some("<p>1 Infinite Loop<br/>Cupertino, CA 95014<br/>US</p>")
        );
    }

    #[test]
    fn test_bigcommerce_newlines_become_breaks() {
        let profile = BigCommerceProfile {
            name: Some("Big".to_owned()),
            address: Some("1 Road\nAustin, TX\nUSA".to_owned()),
        };
        assert_eq!(
            profile.address().as_deref(),
            Some("1 Road<br/>Austin, TX<br/>USA")
        );
    }

    #[test]
    fn test_named_profile_has_no_address() {
        let profile = NamedProfile {
            name: Some("Tic".to_owned()),
        };
        assert_eq!(profile.business_name().as_deref(), Some("Tic"));
        assert_eq!(profile.address(), None);
    }

    #[test]
    fn test_ecwid_state_postal_country() {
        let profile: EcwidProfile = serde_json::from_value(json!({
            "company": {
                "companyName": "Eco",
                "stateOrProvinceCode": "ON",
                "postalCode": "m5v 2t6",
                "countryCode": "CA"
            }
        }))
        .unwrap();
        assert_eq!(profile.business_name().as_deref(), Some("Eco"));
        assert_eq!(
            profile.address().as_deref(),
            Some("<p>On M5V 2T6<br/>Ca</p>")
        );
    }

    #[test]
    fn test_ecwid_address_does_not_accumulate() {
        let profile = EcwidProfile::default();
        let first = profile.address();
        let second = profile.address();
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("<p> <br/></p>"));
    }

    #[test]
    fn test_magento_address_verbatim() {
        let profile = MagentoProfile {
            business_name: Some("Mage".to_owned()),
            address: Some("<p>Already\nformatted</p>".to_owned()),
        };
        assert_eq!(profile.business_name().as_deref(), Some("Mage"));
        assert_eq!(
            profile.address().as_deref(),
            Some("<p>Already\nformatted</p>")
        );
    }
}
