//! Read-side views over a loaded catalog.

use fortumo_sdk::objects::{CountryInformation, CountrySummary};
use itertools::Itertools;

use super::{Catalog, CountryRecord};

impl Catalog {
    /// Code and name of every country, sorted by name. Countries with equal
    /// names keep their document order.
    pub fn countries(&self) -> Vec<CountrySummary> {
        self.iter()
            .map(|country| CountrySummary {
                code: country.code.clone(),
                name: country.attributes.get("name").cloned().unwrap_or_default(),
            })
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect()
    }

    /// Pricing information for `code`, or for the first country in document
    /// order when no code is given.
    ///
    /// The code is trimmed and uppercased before lookup.
    pub fn country_info(&self, code: Option<&str>) -> Option<CountryInformation> {
        let record = match code.filter(|c| !c.is_empty()) {
            Some(code) => self.get(&code.trim().to_uppercase())?,
            None => self.first()?,
        };
        Some(record.information())
    }
}

impl CountryRecord {
    /// Flatten prices, message profiles and operators into one record per
    /// (price, operator) pair.
    pub fn information(&self) -> CountryInformation {
        let all_operators = self
            .prices
            .first()
            .filter(|price| price.applies_to_all_operators())
            .map(|price| price.flatten(None));

        let operators = self
            .prices
            .iter()
            .flat_map(|price| {
                price
                    .message_profile
                    .operators
                    .iter()
                    .map(move |operator| price.flatten(Some(operator)))
            })
            .collect();

        CountryInformation {
            country: self.attributes.clone(),
            all_operators,
            operators,
            promotional_text: self.promotional_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::loader::tests::SERVICE_XML;
    use super::super::load_catalog;
    use super::*;
    use fortumo_sdk::objects::Attributes;

    fn catalog() -> Catalog {
        load_catalog(SERVICE_XML.as_bytes(), false, None).unwrap()
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_countries_sorted_by_name() {
        let names: Vec<_> = catalog()
            .countries()
            .into_iter()
            .map(|c| (c.code, c.name))
            .collect();
        assert_eq!(
            names,
            [
                ("BA".to_owned(), "Bosnia & Herzegovina".to_owned()),
                ("EE".to_owned(), "Estonia".to_owned()),
                ("LV".to_owned(), "Latvia".to_owned()),
            ]
        );
    }

    #[test]
    fn test_equal_names_keep_document_order() {
        let xml = r#"<services_api_response>
            <status><code>0</code></status>
            <service id="s"><countries>
              <country approved="true" code="ZZ" name="Same"/>
              <country approved="true" code="AA" name="Same"/>
              <country approved="true" code="MM" name="Alpha"/>
            </countries></service>
        </services_api_response>"#;
        let catalog = load_catalog(xml.as_bytes(), true, None).unwrap();
        let codes: Vec<_> = catalog.countries().into_iter().map(|c| c.code).collect();
        assert_eq!(codes, ["MM", "ZZ", "AA"]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.countries().is_empty());
        assert_eq!(catalog.country_info(None), None);
        assert_eq!(catalog.country_info(Some("EE")), None);
    }

    #[test]
    fn test_default_country_is_first_in_document() {
        let info = catalog().country_info(None).unwrap();
        assert_eq!(info.code(), Some("EE"));
        assert_eq!(catalog().country_info(Some("")).unwrap().code(), Some("EE"));
    }

    #[test]
    fn test_lookup_normalizes_code() {
        let info = catalog().country_info(Some(" lv \n")).unwrap();
        assert_eq!(info.name(), Some("Latvia"));
        assert_eq!(catalog().country_info(Some("xx")), None);
    }

    #[test]
    fn test_all_operators_record() {
        let info = catalog().country_info(Some("EE")).unwrap();
        assert_eq!(
            info.all_operators,
            Some(attrs(&[
                ("amount", "0.32"),
                ("currency", "EUR"),
                ("vat_included", "true"),
                ("keyword", "TXT FOR"),
                ("shortcode", "1311"),
            ]))
        );
        assert_eq!(info.promotional_text, Some(attrs(&[("lang", "et"), ("local", "true")])));
    }

    #[test]
    fn test_operators_flattened_per_price_and_operator() {
        let info = catalog().country_info(Some("EE")).unwrap();
        assert_eq!(info.operators.len(), 2);
        assert_eq!(info.operators[0]["name"], "Elisa");
        assert_eq!(info.operators[0]["shortcode"], "1311");
        // Operator overrides the message profile.
        assert_eq!(info.operators[1]["shortcode"], "1312");
        assert!(info.operators.iter().all(|o| !o.contains_key("all_operators")));
    }

    #[test]
    fn test_multiple_prices_in_document_order() {
        let info = catalog().country_info(Some("ba")).unwrap();
        assert_eq!(info.all_operators, None);
        assert_eq!(info.promotional_text, None);

        let summary: Vec<_> = info
            .operators
            .iter()
            .map(|o| (o["code"].as_str(), o["amount"].as_str(), o["keyword"].as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                // Operator amount overrides the price amount.
                ("bh", "1.50", "TXT BA"),
                ("bh", "2.00", "TXT BA"),
                ("m-tel", "2.00", "TXT MT"),
            ]
        );
    }
}
