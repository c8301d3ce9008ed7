//! Business profile derived from linked storefront accounts.
//!
//! A user may link several third-party storefronts. Each platform reports
//! the business under a different payload shape; [`LinkedAccount`] turns the
//! stored `{ "type": ..., "details": { "profile": ... } }` record into one
//! typed variant per platform, and [`aggregate`] folds a list of them into a
//! single [`BusinessProfile`].
//!
//! # Aggregation
//!
//! Accounts are visited in list order and a later account overwrites the
//! fields an earlier one produced: with an Etsy account followed by a
//! Shopify account, both fields come from Shopify. A platform only
//! overwrites a field it has a source for. Tictail and NowInStore have no
//! address, an Etsy account with no shops has no name, and unsupported
//! platforms have neither; these leave the earlier value in place.
//!
//! Extraction never fails. Missing or malformed payload fields degrade to
//! empty strings.

mod platforms;

pub use platforms::{
    BigCommerceProfile, EcwidCompany, EcwidProfile, EtsyAddress, EtsyProfile, EtsyShop,
    MagentoProfile, NamedProfile, ShopifyProfile,
};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

/// Extraction strategy for one platform's profile payload.
///
/// `None` means the platform has no source for the field, so the
/// aggregated value is left untouched. `Some("")` overwrites with empty.
pub trait ProfileSource {
    /// Business name reported by the platform.
    fn business_name(&self) -> Option<String>;

    /// Postal address formatted as HTML.
    fn address(&self) -> Option<String>;
}

/// A connection to a third-party storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AccountRecord", into = "AccountRecord")]
pub enum LinkedAccount {
    Etsy(EtsyProfile),
    Shopify(ShopifyProfile),
    BigCommerce(BigCommerceProfile),
    Tictail(NamedProfile),
    Ecwid(EcwidProfile),
    NowInStore(NamedProfile),
    Magento(MagentoProfile),
    /// A platform this crate does not extract from.
    Unsupported {
        /// The stored platform tag.
        platform: String,
    },
}

impl LinkedAccount {
    /// The stored platform tag.
    #[must_use]
    pub fn platform(&self) -> &str {
        match self {
            Self::Etsy(_) => "etsy",
            Self::Shopify(_) => "shopify",
            Self::BigCommerce(_) => "bigcommerce",
            Self::Tictail(_) => "tictail",
            Self::Ecwid(_) => "ecwid",
            Self::NowInStore(_) => "nowinstore",
            Self::Magento(_) => "magento",
            Self::Unsupported { platform } => platform,
        }
    }

    /// Build a typed account from a platform tag and its raw `details` blob.
    ///
    /// The profile is read from `details.profile`. Fields degrade one at a
    /// time (see the platform structs); only a payload that is not an
    /// object at all is replaced by an empty profile.
    #[must_use]
    pub fn from_details(platform: &str, details: &Value) -> Self {
        let profile = details.get("profile").unwrap_or(&Value::Null);
        match platform {
            "etsy" => Self::Etsy(parse_profile(platform, profile)),
            "shopify" => Self::Shopify(parse_profile(platform, profile)),
            "bigcommerce" => Self::BigCommerce(parse_profile(platform, profile)),
            "tictail" => Self::Tictail(parse_profile(platform, profile)),
            "ecwid" => Self::Ecwid(parse_profile(platform, profile)),
            "nowinstore" => Self::NowInStore(parse_profile(platform, profile)),
            "magento" => Self::Magento(parse_profile(platform, profile)),
            other => Self::Unsupported {
                platform: other.to_owned(),
            },
        }
    }

    fn source(&self) -> Option<&dyn ProfileSource> {
        let source: &dyn ProfileSource = match self {
            Self::Etsy(p) => p,
            Self::Shopify(p) => p,
            Self::BigCommerce(p) => p,
            Self::Tictail(p) | Self::NowInStore(p) => p,
            Self::Ecwid(p) => p,
            Self::Magento(p) => p,
            Self::Unsupported { .. } => return None,
        };
        Some(source)
    }
}

impl ProfileSource for LinkedAccount {
    fn business_name(&self) -> Option<String> {
        self.source().and_then(ProfileSource::business_name)
    }

    fn address(&self) -> Option<String> {
        self.source().and_then(ProfileSource::address)
    }
}

fn parse_profile<T: DeserializeOwned + Default>(platform: &str, profile: &Value) -> T {
    if profile.is_null() {
        debug!(platform, "Linked account has no profile payload");
        return T::default();
    }
    serde_json::from_value(profile.clone()).unwrap_or_else(|e| {
        debug!(platform, error = %e, "Malformed linked account profile");
        T::default()
    })
}

/// Stored shape of a linked account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AccountRecord {
    #[serde(rename = "type", default)]
    platform: String,
    #[serde(default)]
    details: Value,
}

impl From<AccountRecord> for LinkedAccount {
    fn from(record: AccountRecord) -> Self {
        Self::from_details(&record.platform, &record.details)
    }
}

impl From<LinkedAccount> for AccountRecord {
    fn from(account: LinkedAccount) -> Self {
        let platform = account.platform().to_owned();
        let profile = match &account {
            LinkedAccount::Etsy(p) => serde_json::to_value(p),
            LinkedAccount::Shopify(p) => serde_json::to_value(p),
            LinkedAccount::BigCommerce(p) => serde_json::to_value(p),
            LinkedAccount::Tictail(p) | LinkedAccount::NowInStore(p) => serde_json::to_value(p),
            LinkedAccount::Ecwid(p) => serde_json::to_value(p),
            LinkedAccount::Magento(p) => serde_json::to_value(p),
            LinkedAccount::Unsupported { .. } => Ok(Value::Null),
        }
        .unwrap_or(Value::Null);

        let details = if profile.is_null() {
            Value::Null
        } else {
            json!({ "profile": profile })
        };
        Self { platform, details }
    }
}

/// Business name and address derived from linked accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BusinessProfile {
    pub business_name: String,
    pub address: String,
}

/// Fold `accounts` into one profile, later accounts overwriting earlier ones.
#[must_use]
pub fn aggregate(accounts: &[LinkedAccount]) -> BusinessProfile {
    accounts
        .iter()
        .fold(BusinessProfile::default(), |mut profile, account| {
            if let Some(name) = account.business_name() {
                profile.business_name = name;
            }
            if let Some(address) = account.address() {
                profile.address = address;
            }
            profile
        })
}

/// The aggregated business name.
#[must_use]
pub fn business_name(accounts: &[LinkedAccount]) -> String {
    aggregate(accounts).business_name
}

/// The aggregated address.
#[must_use]
pub fn address(accounts: &[LinkedAccount]) -> String {
    aggregate(accounts).address
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account(value: Value) -> LinkedAccount {
        serde_json::from_value(value).unwrap()
    }

    fn etsy_foo() -> LinkedAccount {
        account(json!({
            "type": "etsy",
            "details": { "profile": {
                "Shops": [{ "shop_name": "Foo" }],
                "Addresses": [{
                    "first_line": "1 high st",
                    "city": "leeds",
                    "state": "west yorkshire",
                    "zip": "ls1 1aa",
                    "country_name": "united kingdom"
                }]
            }}
        }))
    }

    fn shopify_bar() -> LinkedAccount {
        account(json!({
            "type": "shopify",
            "details": { "profile": {
                "name": "Bar",
                "address1": "2 Side St",
                "city": "Ottawa",
                "province_code": "ON",
                "zip": "K1A 0B1",
                "country": "Canada"
            }}
        }))
    }

    #[test]
    fn test_record_maps_to_variant() {
        assert!(matches!(etsy_foo(), LinkedAccount::Etsy(_)));
        assert!(matches!(shopify_bar(), LinkedAccount::Shopify(_)));
        assert_eq!(
            account(json!({ "type": "storenvy", "details": {} })),
            LinkedAccount::Unsupported {
                platform: "storenvy".to_owned()
            }
        );
    }

    #[test]
    fn test_last_match_wins() {
        let profile = aggregate(&[etsy_foo(), shopify_bar()]);
        assert_eq!(profile.business_name, "Bar");
        assert_eq!(
            profile.address,
            "<p>2 Side St<br/>Ottawa, ON K1A 0B1<br/>Canada</p>"
        );

        let reversed = aggregate(&[shopify_bar(), etsy_foo()]);
        assert_eq!(reversed.business_name, "Foo");
        assert_eq!(
            reversed.address,
            "<p>1 High St<br/>Leeds<br/>West Yorkshire LS1 1AA<br/>United Kingdom</p>"
        );
    }

    #[test]
    fn test_platform_without_address_keeps_earlier_address() {
        let tictail = account(json!({
            "type": "tictail",
            "details": { "profile": { "name": "Tic" } }
        }));
        let profile = aggregate(&[shopify_bar(), tictail]);
        assert_eq!(profile.business_name, "Tic");
        assert_eq!(
            profile.address,
            "<p>2 Side St<br/>Ottawa, ON K1A 0B1<br/>Canada</p>"
        );
    }

    #[test]
    fn test_unsupported_and_empty() {
        assert_eq!(aggregate(&[]), BusinessProfile::default());

        let unsupported = account(json!({ "type": "storenvy" }));
        assert_eq!(business_name(&[unsupported.clone()]), "");
        assert_eq!(
            address(&[shopify_bar(), unsupported]),
            "<p>2 Side St<br/>Ottawa, ON K1A 0B1<br/>Canada</p>"
        );
    }

    #[test]
    fn test_malformed_payloads_degrade() {
        let no_details = account(json!({ "type": "shopify" }));
        assert_eq!(no_details.business_name().as_deref(), Some(""));
        assert_eq!(no_details.address().as_deref(), Some("<p><br/>,  <br/></p>"));

        let wrong_shape = account(json!({
            "type": "etsy",
            "details": { "profile": { "Shops": "not a list" } }
        }));
        assert_eq!(wrong_shape, LinkedAccount::Etsy(EtsyProfile::default()));
        assert_eq!(wrong_shape.business_name(), None);

        let bigcommerce = account(json!({
            "type": "bigcommerce",
            "details": { "profile": { "name": "Big" } }
        }));
        assert_eq!(bigcommerce.address().as_deref(), Some(""));
    }

    #[test]
    fn test_badly_typed_field_keeps_sibling_fields() {
        let shopify = account(json!({
            "type": "shopify",
            "details": { "profile": {
                "name": "Bar",
                "address1": "1 Market St",
                "city": "Austin",
                "province_code": "TX",
                "zip": 78701,
                "country": ["US"]
            }}
        }));

        let profile = aggregate(&[etsy_foo(), shopify]);
        assert_eq!(profile.business_name, "Bar");
        assert_eq!(profile.address, "<p>1 Market St<br/>Austin, TX 78701<br/></p>");
    }

    #[test]
    fn test_badly_typed_shop_keeps_addresses() {
        let etsy = account(json!({
            "type": "etsy",
            "details": { "profile": {
                "Shops": [{ "shop_name": { "en": "Foo" } }],
                "Addresses": [{ "first_line": "1 high st", "zip": 1001 }]
            }}
        }));
        assert_eq!(etsy.business_name().as_deref(), Some(""));
        assert_eq!(
            etsy.address().as_deref(),
            Some("<p>1 High St<br/><br/> 1001<br/></p>")
        );
    }

    #[test]
    fn test_etsy_without_shops_keeps_earlier_name() {
        let empty_etsy = account(json!({
            "type": "etsy",
            "details": { "profile": { "Shops": [], "Addresses": [] } }
        }));
        let profile = aggregate(&[shopify_bar(), empty_etsy]);
        assert_eq!(profile.business_name, "Bar");
    }

    #[test]
    fn test_serializes_back_to_record_shape() {
        let value = serde_json::to_value(shopify_bar()).unwrap();
        assert_eq!(value["type"], "shopify");
        assert_eq!(value["details"]["profile"]["name"], "Bar");

        let unsupported = serde_json::to_value(LinkedAccount::Unsupported {
            platform: "storenvy".to_owned(),
        })
        .unwrap();
        assert_eq!(unsupported, json!({ "type": "storenvy", "details": null }));
    }
}
