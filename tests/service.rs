use pretty_assertions::assert_eq;
use serde_json::json;

use soapfold::{error::Error, wsdl::types::Params, WsdlService};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn connects_to_local_wsdl() {
    let service = WsdlService::connect(fixture("countryinfo.wsdl")).unwrap();

    assert_eq!(service.url().scheme(), "file");
    assert_eq!(
        service.all_methods().unwrap(),
        ["CapitalCity", "CountryName", "ListOfContinentsByName"]
    );
}

#[test]
fn connect_rejects_non_xml_source() {
    assert!(matches!(
        WsdlService::connect(fixture("not_xml.txt")),
        Err(Error::NotXmlResponse(..))
    ));
}

#[test]
fn lazy_service_defers_the_fetch() {
    let service = WsdlService::new(fixture("not_xml.txt")).unwrap();

    assert!(matches!(
        service.namespaces(),
        Err(Error::NotXmlResponse(..))
    ));
}

#[test]
fn resolves_method_params() {
    let service = WsdlService::new(fixture("countryinfo.wsdl")).unwrap();
    let params = service.method_params_by_name("CapitalCity").unwrap();

    assert_eq!(params.request.len(), 1);
    assert_eq!(params.request[0].name, "parameters");
    assert_eq!(params.request[0].namespace, "tns");

    match &params.response[0].params {
        Params::Sequence(members) => {
            assert_eq!(members.len(), 1);
            assert_eq!(members[0]["name"], "CapitalCityResult");
        }
        other => panic!("expected a sequence, got {:?}", other),
    }

    assert!(matches!(
        service.method_params_by_name("DoesNotExist"),
        Err(Error::WsdlError(..))
    ));
}

#[test]
fn reports_namespaces() {
    let service = WsdlService::new(fixture("countryinfo.wsdl")).unwrap();
    let namespaces = service.namespaces().unwrap();

    let tns = namespaces
        .iter()
        .find(|namespace| namespace.short == "tns")
        .unwrap();
    assert_eq!(tns.full, "http://www.oorsprong.org/websamples.countryinfo");
}

#[test]
fn folds_soap_response() {
    let xml = std::fs::read_to_string(fixture("country_name_response.xml")).unwrap();

    assert_eq!(
        WsdlService::xml_data_as_json(&xml).unwrap(),
        json!({"CountryNameResponse": {"CountryNameResult": "United States"}})
    );
}

#[test]
fn folds_repeated_records_in_order() {
    let xml = std::fs::read_to_string(fixture("continents_response.xml")).unwrap();

    assert_eq!(
        WsdlService::xml_data_as_json(&xml).unwrap(),
        json!({
            "ListOfContinentsByNameResponse": {
                "ListOfContinentsByNameResult": {
                    "tContinent": [
                        {"sCode": "AF", "sName": "Africa"},
                        {"sCode": "AN", "sName": "Antarctica"},
                        {"sCode": "AS", "sName": "Asia"}
                    ]
                }
            }
        })
    );
}

#[test]
fn malformed_xml_is_an_error() {
    assert!(matches!(
        WsdlService::xml_data_as_json("<a><b></a>"),
        Err(Error::XmlError(..))
    ));
}
