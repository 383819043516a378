use super::*;

#[test]
fn account_kind_keeps_backend_spelling() {
    assert_eq!(
        serde_json::to_string(&AccountKind::Physical).expect("serialize"),
        "\"FISICAL\""
    );
    assert_eq!(
        serde_json::to_string(&AccountKind::Organization).expect("serialize"),
        "\"ONG\""
    );
}

#[test]
fn registration_dto_omits_unset_optionals_and_renames_kind() {
    let dto = RegistrationDto {
        first_name: "Patas".into(),
        last_name: "Felizes".into(),
        email: "contato@patas.org".into(),
        password: "mysecretpassword".into(),
        confirm_password: "mysecretpassword".into(),
        phone: "11999990000".into(),
        date_of_birth: "1990-01-01".into(),
        job: None,
        cpf: None,
        cnpj: Some("12345678000190".into()),
        description: None,
        kind: AccountKind::Organization,
        street: "Rua das Flores".into(),
        number: None,
        neighborhood: "Centro".into(),
        city: "Sao Paulo".into(),
        state: "SP".into(),
    };

    let value = serde_json::to_value(&dto).expect("serialize");
    let object = value.as_object().expect("object");
    assert_eq!(object["type"], "ONG");
    assert_eq!(object["firstName"], "Patas");
    assert!(!object.contains_key("cpf"));
    assert!(!object.contains_key("job"));
    assert_eq!(object["cnpj"], "12345678000190");
}

#[test]
fn animal_summary_decodes_backend_shape() {
    let raw = r#"{
        "id": 42,
        "type": "DOG",
        "name": "Rex",
        "color": "BLACK",
        "description": "Friendly",
        "files": [{"id": 1, "filename": "rex.jpg"}]
    }"#;

    let animal: AnimalSummary = serde_json::from_str(raw).expect("decode");
    assert_eq!(animal.id, AnimalId(42));
    assert_eq!(animal.kind, AnimalKind::Dog);
    assert_eq!(animal.name.as_deref(), Some("Rex"));
    assert_eq!(animal.files.len(), 1);
}
