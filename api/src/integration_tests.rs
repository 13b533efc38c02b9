//! HTTP integration tests
//!
//! Drive the full router (extractors, services, error rendering) with
//! axum-test against the in-memory store.
//!
//! Run with: cargo test integration_tests

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use crate::test_utils::InMemoryCnesStore;
use crate::{build_router, AppState, Repositories};

fn create_test_server() -> (TestServer, Arc<InMemoryCnesStore>) {
    let store = Arc::new(InMemoryCnesStore::new());
    let state = AppState::new(Repositories::in_memory(store.clone()));
    let server = TestServer::new(build_router(state)).expect("Failed to create test server");
    (server, store)
}

fn mantenedora_body(cnpj: &str) -> Value {
    json!({
        "cnpj_mantenedora": cnpj,
        "nome_razao_social_mantenedora": "Instituto Fortaleza de Medicina",
        "numero_telefone_mantenedora": "(85) 3219-1234",
        "codigo_banco": "001",
        "numero_agencia": "1234",
        "numero_conta_corrente": "56789-0"
    })
}

fn estabelecimento_body(mantenedora: &Value, codigo_unidade: &str, codigo_cnes: &str) -> Value {
    json!({
        "codigo_unidade": codigo_unidade,
        "codigo_cnes": codigo_cnes,
        "cnpj_mantenedora": mantenedora["cnpj_mantenedora"],
        "nome_razao_social_estabelecimento": "Hospital Geral de Fortaleza Ltda",
        "nome_fantasia_estabelecimento": "Hospital Geral",
        "numero_telefone_estabelecimento": "85 3101 7000",
        "mantenedora_id": mantenedora["id"]
    })
}

async fn post_json(server: &TestServer, path: &str, body: &Value) -> Value {
    let response = server.post(path).json(body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

/// Mantenedora plus one facility, returned as JSON
async fn seed_estabelecimento(server: &TestServer) -> (Value, Value) {
    let mantenedora = post_json(server, "/mantenedoras", &mantenedora_body("12345678901234")).await;
    let estabelecimento = post_json(
        server,
        "/estabelecimentos",
        &estabelecimento_body(&mantenedora, "2304402000001", "7891011"),
    )
    .await;
    (mantenedora, estabelecimento)
}

// =============================================================================
// Health
// =============================================================================

mod health {
    use super::*;

    #[tokio::test]
    async fn healthy_when_database_answers() {
        let (server, _store) = create_test_server();

        let response = server.get("/healthcheck").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn unhealthy_returns_503() {
        let (server, store) = create_test_server();
        store.set_healthy(false);

        let response = server.get("/healthcheck").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.json::<Value>(),
            json!({"status": "unhealthy", "database": "disconnected"})
        );
    }
}

// =============================================================================
// Mantenedoras
// =============================================================================

mod mantenedoras {
    use super::*;

    #[tokio::test]
    async fn create_then_get() {
        let (server, _store) = create_test_server();

        let created = post_json(&server, "/mantenedoras", &mantenedora_body("12345678901234")).await;
        let response = server.get(&format!("/mantenedoras/{}", created["id"])).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), created);
        assert!(created["data_criacao_mantenedora"].is_string());
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let (server, _store) = create_test_server();
        post_json(&server, "/mantenedoras", &mantenedora_body("12345678901234")).await;

        let first = server.get("/mantenedoras").await.json::<Value>();
        let second = server.get("/mantenedoras").await.json::<Value>();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn duplicate_cnpj_is_400() {
        let (server, _store) = create_test_server();
        post_json(&server, "/mantenedoras", &mantenedora_body("12345678901234")).await;

        let response = server
            .post("/mantenedoras")
            .json(&mantenedora_body("12345678901234"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["details"], "CNPJ já cadastrado");
    }

    #[tokio::test]
    async fn invalid_fields_are_422_with_field_list() {
        let (server, _store) = create_test_server();
        let mut body = mantenedora_body("1234");
        body["numero_telefone_mantenedora"] = json!("85999999999");

        let response = server.post("/mantenedoras").json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        let fields: Vec<&str> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"cnpj_mantenedora"));
        assert!(fields.contains(&"numero_telefone_mantenedora"));
    }

    #[tokio::test]
    async fn missing_required_field_is_422() {
        let (server, _store) = create_test_server();

        let response = server
            .post("/mantenedoras")
            .json(&json!({"cnpj_mantenedora": "12345678901234"}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "Validation error");
        assert_eq!(body["fields"][0]["field"], "nome_razao_social_mantenedora");
    }

    #[tokio::test]
    async fn wrong_json_type_is_422_for_that_field() {
        let (server, _store) = create_test_server();
        let mut body = mantenedora_body("12345678901234");
        body["codigo_banco"] = json!(1);

        let response = server.post("/mantenedoras").json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["fields"][0]["field"], "codigo_banco");
    }

    #[tokio::test]
    async fn non_numeric_id_is_400_with_json_body() {
        let (server, _store) = create_test_server();

        let response = server.get("/mantenedoras/abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "Invalid request");
        assert!(body["details"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn unparsable_pagination_is_400_with_json_body() {
        let (server, _store) = create_test_server();

        let response = server
            .get("/mantenedoras")
            .add_query_param("limit", "abc")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "Invalid request");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn cnpj_change_follows_to_facilities() {
        let (server, _store) = create_test_server();
        let (mantenedora, estabelecimento) = seed_estabelecimento(&server).await;

        server
            .patch(&format!("/mantenedoras/{}", mantenedora["id"]))
            .json(&json!({"cnpj_mantenedora": "99999999999999"}))
            .await
            .assert_status_ok();

        let facility_path = format!("/estabelecimentos/{}", estabelecimento["id"]);
        let facility = server.get(&facility_path).await.json::<Value>();
        assert_eq!(facility["cnpj_mantenedora"], "99999999999999");

        let repointed = server
            .patch(&facility_path)
            .json(&json!({"mantenedora_id": mantenedora["id"]}))
            .await;
        repointed.assert_status_ok();
        assert_eq!(repointed.json::<Value>()["cnpj_mantenedora"], "99999999999999");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (server, _store) = create_test_server();

        let response = server
            .post("/mantenedoras")
            .content_type("application/json")
            .bytes("{not json".into())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn put_and_patch_are_partial() {
        let (server, _store) = create_test_server();
        let created = post_json(&server, "/mantenedoras", &mantenedora_body("12345678901234")).await;
        let path = format!("/mantenedoras/{}", created["id"]);

        let put = server
            .put(&path)
            .json(&json!({"codigo_banco": "104"}))
            .await;
        put.assert_status_ok();
        assert_eq!(put.json::<Value>()["codigo_banco"], "104");

        let patch = server
            .patch(&path)
            .json(&json!({"numero_telefone_mantenedora": null}))
            .await;
        patch.assert_status_ok();
        let body = patch.json::<Value>();
        assert!(body["numero_telefone_mantenedora"].is_null());
        assert_eq!(body["codigo_banco"], "104");
        assert_eq!(body["cnpj_mantenedora"], "12345678901234");
    }

    #[tokio::test]
    async fn delete_is_204_then_404() {
        let (server, _store) = create_test_server();
        let created = post_json(&server, "/mantenedoras", &mantenedora_body("12345678901234")).await;
        let path = format!("/mantenedoras/{}", created["id"]);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status_not_found();
        server.delete(&path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_cascades_to_facilities() {
        let (server, store) = create_test_server();
        let (mantenedora, estabelecimento) = seed_estabelecimento(&server).await;
        post_json(
            &server,
            "/enderecos",
            &json!({
                "cep_estabelecimento": "60150-160",
                "bairro": "Papicu",
                "logradouro": "Rua Ávila Goulart",
                "numero": "900",
                "estabelecimento_id": estabelecimento["id"]
            }),
        )
        .await;

        server
            .delete(&format!("/mantenedoras/{}", mantenedora["id"]))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/estabelecimentos/{}", estabelecimento["id"]))
            .await
            .assert_status_not_found();
        assert_eq!(store.estabelecimento_count(), 0);
        assert_eq!(store.endereco_count(), 0);
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let (server, _store) = create_test_server();
        for cnpj in ["11111111111111", "22222222222222", "33333333333333"] {
            post_json(&server, "/mantenedoras", &mantenedora_body(cnpj)).await;
        }

        let page = server
            .get("/mantenedoras")
            .add_query_param("limit", 1)
            .add_query_param("offset", 1)
            .await
            .json::<Value>();
        assert_eq!(page.as_array().unwrap().len(), 1);
        assert_eq!(page[0]["cnpj_mantenedora"], "22222222222222");

        let by_cnpj = server
            .get("/mantenedoras")
            .add_query_param("cnpj", "33333333333333")
            .await
            .json::<Value>();
        assert_eq!(by_cnpj.as_array().unwrap().len(), 1);
    }
}

// =============================================================================
// Estabelecimentos and enderecos
// =============================================================================

mod estabelecimentos {
    use super::*;

    #[tokio::test]
    async fn create_normalizes_phone_and_embeds_missing_endereco() {
        let (server, _store) = create_test_server();
        let (_mantenedora, estabelecimento) = seed_estabelecimento(&server).await;

        assert_eq!(
            estabelecimento["numero_telefone_estabelecimento"],
            "(85) 3101-7000"
        );

        let detalhe = server
            .get(&format!("/estabelecimentos/{}", estabelecimento["id"]))
            .await
            .json::<Value>();
        assert_eq!(detalhe["codigo_cnes"], "7891011");
        assert!(detalhe["endereco"].is_null());
    }

    #[tokio::test]
    async fn unknown_mantenedora_is_404() {
        let (server, _store) = create_test_server();
        let mantenedora = json!({"id": 42, "cnpj_mantenedora": "12345678901234"});

        let response = server
            .post("/estabelecimentos")
            .json(&estabelecimento_body(&mantenedora, "2304402000001", "7891011"))
            .await;

        response.assert_status_not_found();
        assert_eq!(
            response.json::<Value>()["details"],
            "Mantenedora com ID 42 não encontrada"
        );
    }

    #[tokio::test]
    async fn mismatched_cnpj_is_422() {
        let (server, _store) = create_test_server();
        let mantenedora =
            post_json(&server, "/mantenedoras", &mantenedora_body("12345678901234")).await;
        let mut body = estabelecimento_body(&mantenedora, "2304402000001", "7891011");
        body["cnpj_mantenedora"] = json!("99999999999999");

        let response = server.post("/estabelecimentos").json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<Value>()["fields"][0]["field"],
            "cnpj_mantenedora"
        );
    }

    #[tokio::test]
    async fn duplicate_codigo_unidade_is_400() {
        let (server, _store) = create_test_server();
        let (mantenedora, _estabelecimento) = seed_estabelecimento(&server).await;

        let response = server
            .post("/estabelecimentos")
            .json(&estabelecimento_body(&mantenedora, "2304402000001", "7891012"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["details"],
            "Código da unidade já cadastrado"
        );
    }

    #[tokio::test]
    async fn duplicate_codigo_cnes_is_400() {
        let (server, _store) = create_test_server();
        let (mantenedora, _estabelecimento) = seed_estabelecimento(&server).await;

        let response = server
            .post("/estabelecimentos")
            .json(&estabelecimento_body(&mantenedora, "2304402000002", "7891011"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["details"],
            "Código CNES já cadastrado"
        );
    }

    #[tokio::test]
    async fn lookups_by_natural_keys() {
        let (server, _store) = create_test_server();
        let (_mantenedora, estabelecimento) = seed_estabelecimento(&server).await;

        let by_unidade = server
            .get("/estabelecimentos/unidade/2304402000001")
            .await
            .json::<Value>();
        let by_cnes = server.get("/estabelecimentos/cnes/7891011").await.json::<Value>();

        assert_eq!(by_unidade["id"], estabelecimento["id"]);
        assert_eq!(by_cnes["id"], estabelecimento["id"]);
        server
            .get("/estabelecimentos/cnes/0000000")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn endereco_lifecycle() {
        let (server, _store) = create_test_server();
        let (_mantenedora, estabelecimento) = seed_estabelecimento(&server).await;
        let endereco = json!({
            "latitude": -3.7319,
            "longitude": -38.5267,
            "cep_estabelecimento": "60150-160",
            "bairro": "Papicu",
            "logradouro": "Rua Ávila Goulart",
            "numero": "900",
            "estabelecimento_id": estabelecimento["id"]
        });

        let created = post_json(&server, "/enderecos", &endereco).await;
        assert_eq!(created["cep_estabelecimento"], "60150160");

        let second = server.post("/enderecos").json(&endereco).await;
        second.assert_status(StatusCode::BAD_REQUEST);

        let embedded = server
            .get(&format!("/estabelecimentos/{}/endereco", estabelecimento["id"]))
            .await
            .json::<Value>();
        assert_eq!(embedded, created);

        let listed = server.get("/estabelecimentos").await.json::<Value>();
        assert_eq!(listed[0]["endereco"]["id"], created["id"]);

        let by_cep = server
            .get("/enderecos")
            .add_query_param("cep", "60150-160")
            .await
            .json::<Value>();
        assert_eq!(by_cep.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn endereco_for_missing_facility_is_404() {
        let (server, _store) = create_test_server();

        let response = server
            .post("/enderecos")
            .json(&json!({
                "cep_estabelecimento": "60150160",
                "bairro": "Papicu",
                "logradouro": "Rua Ávila Goulart",
                "numero": "900",
                "estabelecimento_id": 99
            }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn out_of_range_latitude_is_422() {
        let (server, _store) = create_test_server();
        let (_mantenedora, estabelecimento) = seed_estabelecimento(&server).await;

        let response = server
            .post("/enderecos")
            .json(&json!({
                "latitude": 91.0,
                "cep_estabelecimento": "60150160",
                "bairro": "Papicu",
                "logradouro": "Rua Ávila Goulart",
                "numero": "900",
                "estabelecimento_id": estabelecimento["id"]
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

// =============================================================================
// Profissionais, equipes and memberships
// =============================================================================

mod equipes {
    use super::*;

    async fn seed_equipe(server: &TestServer) -> Value {
        seed_estabelecimento(server).await;
        post_json(
            server,
            "/equipes",
            &json!({
                "codigo_equipe": "0001234567",
                "nome_equipe": "ESF Papicu",
                "tipo_equipe": "70",
                "codigo_unidade": "2304402000001"
            }),
        )
        .await
    }

    async fn seed_profissional(server: &TestServer, codigo_sus: &str) -> Value {
        post_json(
            server,
            "/profissionais",
            &json!({
                "codigo_profissional_sus": codigo_sus,
                "nome_profissional": "Maria da Silva",
                "codigo_cns": "898001160660006"
            }),
        )
        .await
    }

    #[tokio::test]
    async fn unknown_codigo_unidade_is_400() {
        let (server, _store) = create_test_server();

        let response = server
            .post("/equipes")
            .json(&json!({
                "codigo_equipe": "0001234567",
                "nome_equipe": "ESF Papicu",
                "tipo_equipe": "70",
                "codigo_unidade": "9999999999999"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["details"],
            "Estabelecimento não encontrado"
        );
    }

    #[tokio::test]
    async fn membership_by_natural_keys() {
        let (server, _store) = create_test_server();
        let equipe = seed_equipe(&server).await;
        let profissional = seed_profissional(&server, "980016281234567").await;

        let vinculo = post_json(
            &server,
            "/equipeprofs",
            &json!({
                "codigo_equipe": "0001234567",
                "codigo_profissional_sus": "980016281234567"
            }),
        )
        .await;
        assert_eq!(vinculo["equipe_id"], equipe["id"]);
        assert_eq!(vinculo["profissional_id"], profissional["id"]);

        let roster = server
            .get(&format!("/equipes/{}/profissionais", equipe["id"]))
            .await
            .json::<Value>();
        assert_eq!(roster["codigo_equipe"], "0001234567");
        assert_eq!(roster["profissionais"][0]["id"], profissional["id"]);

        let equipes = server
            .get(&format!("/profissionais/{}/equipes", profissional["id"]))
            .await
            .json::<Value>();
        assert_eq!(equipes[0]["id"], equipe["id"]);

        let duplicate = server
            .post("/equipeprofs")
            .json(&json!({
                "codigo_equipe": "0001234567",
                "codigo_profissional_sus": "980016281234567"
            }))
            .await;
        duplicate.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            duplicate.json::<Value>()["details"],
            "Profissional já vinculado a esta equipe"
        );
    }

    #[tokio::test]
    async fn duplicate_codigo_equipe_is_400() {
        let (server, _store) = create_test_server();
        seed_equipe(&server).await;

        let response = server
            .post("/equipes")
            .json(&json!({
                "codigo_equipe": "0001234567",
                "nome_equipe": "ESF Papicu II",
                "tipo_equipe": "70",
                "codigo_unidade": "2304402000001"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["details"],
            "Código da equipe já cadastrado"
        );
    }

    #[tokio::test]
    async fn duplicate_sus_code_is_400() {
        let (server, _store) = create_test_server();
        seed_profissional(&server, "980016281234567").await;

        let response = server
            .post("/profissionais")
            .json(&json!({
                "codigo_profissional_sus": "980016281234567",
                "nome_profissional": "Maria Souza"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["details"],
            "Código do profissional SUS já cadastrado"
        );
    }

    #[tokio::test]
    async fn deleting_profissional_drops_memberships() {
        let (server, store) = create_test_server();
        let equipe = seed_equipe(&server).await;
        let profissional = seed_profissional(&server, "980016281234567").await;
        post_json(
            &server,
            "/equipeprofs",
            &json!({
                "codigo_equipe": "0001234567",
                "codigo_profissional_sus": "980016281234567"
            }),
        )
        .await;

        server
            .delete(&format!("/profissionais/{}", profissional["id"]))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert_eq!(store.equipe_prof_count(), 0);
        let roster = server
            .get(&format!("/equipes/{}/profissionais", equipe["id"]))
            .await
            .json::<Value>();
        assert_eq!(roster["profissionais"], json!([]));
    }

    #[tokio::test]
    async fn profissional_lookup_by_sus_code() {
        let (server, _store) = create_test_server();
        let profissional = seed_profissional(&server, "980016281234567").await;

        let found = server
            .get("/profissionais/sus/980016281234567")
            .await
            .json::<Value>();

        assert_eq!(found, profissional);
    }

    #[tokio::test]
    async fn invalid_cns_is_422() {
        let (server, _store) = create_test_server();

        let response = server
            .post("/profissionais")
            .json(&json!({
                "codigo_profissional_sus": "980016281234567",
                "nome_profissional": "Maria da Silva",
                "codigo_cns": "123"
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
