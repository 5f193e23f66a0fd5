//! Macro-generated test suite for `DataService<Product>` contract validation.
//!
//! The `data_service_tests!` macro generates a test module that validates any
//! `DataService<Product>` implementation: CRUD operations, exact-match search
//! across field types, queries, soft deletion and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use order_desk::storage::InMemoryDataService;
//!
//! data_service_tests!(InMemoryDataService::<Product>::new());
//! ```

/// Generate a full `DataService<Product>` conformance test suite.
///
/// `$factory` is re-evaluated for each test. For the concurrent access test
/// the returned service must also be `Clone + 'static`.
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use order_desk::core::entity::{Data, Entity};
            use order_desk::core::query::{Comparison, RecordQuery, SortDirection};
            use order_desk::core::service::DataService;
            use rust_decimal::Decimal;
            use uuid::Uuid;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;
                let product = create_test_product("Cotton Tee", "TS-001", 1250, 12);
                let id = product.id;

                let created = service.create(product.clone()).await.unwrap();
                assert_eq!(created, product);

                let retrieved = service.get(&id).await.unwrap().unwrap();
                assert_eq!(retrieved.id(), id);
                assert_eq!(retrieved.name(), "Cotton Tee");
                assert_eq!(retrieved.entity_type(), "product");
                assert_eq!(retrieved.price, Decimal::new(1250, 2));
                assert_eq!(retrieved.quantity_per_box, 12);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                assert!(service.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty_and_multiple() {
                let service = $factory;
                assert!(service.list().await.unwrap().is_empty());

                for product in sample_catalog() {
                    service.create(product).await.unwrap();
                }
                assert_eq!(service.list().await.unwrap().len(), 5);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let mut product = service
                    .create(create_test_product("Cap", "CP-003", 800, 20))
                    .await
                    .unwrap();

                product.price = Decimal::new(950, 2);
                product.touch();
                service.update(&product.id, product.clone()).await.unwrap();

                let retrieved = service.get(&product.id).await.unwrap().unwrap();
                assert_eq!(retrieved.price, Decimal::new(950, 2));
                assert!(retrieved.updated_at >= retrieved.created_at);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let product = create_test_product("Ghost", "GH-000", 100, 1);
                let id = product.id;
                assert!(service.update(&id, product).await.is_err());
            }

            #[tokio::test]
            async fn test_create_duplicate_id_is_rejected() {
                let service = $factory;
                let id = Uuid::new_v4();

                service
                    .create(create_test_product_with_id(id, "First", "FI-001"))
                    .await
                    .unwrap();
                let result = service
                    .create(create_test_product_with_id(id, "Second", "SE-002"))
                    .await;

                assert!(result.is_err());
                assert_eq!(service.get(&id).await.unwrap().unwrap().name(), "First");
            }

            #[tokio::test]
            async fn test_delete_existing_and_nonexistent() {
                let service = $factory;
                let product = service
                    .create(create_test_product("Socks", "SK-005", 300, 50))
                    .await
                    .unwrap();

                service.delete(&product.id).await.unwrap();
                assert!(service.get(&product.id).await.unwrap().is_none());

                // Deleting twice is not an error
                service.delete(&product.id).await.unwrap();
            }

            #[tokio::test]
            async fn test_soft_deleted_records_leave_listings() {
                let service = $factory;
                let mut product = service
                    .create(create_test_product("Hoodie", "HD-002", 2500, 5))
                    .await
                    .unwrap();

                product.soft_delete();
                service.update(&product.id, product.clone()).await.unwrap();

                assert!(service.list().await.unwrap().is_empty());
                assert!(service.search("sku", "HD-002").await.unwrap().is_empty());
                assert!(service.get(&product.id).await.unwrap().unwrap().is_deleted());
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_by_field_type() {
                let service = $factory;
                for product in sample_catalog() {
                    service.create(product).await.unwrap();
                }

                let by_code = service.search("sku", "DJ-004").await.unwrap();
                assert_eq!(by_code.len(), 1);
                assert_eq!(by_code[0].name(), "Denim Jacket");

                let by_box = service.search("quantity_per_box", "5").await.unwrap();
                assert_eq!(by_box.len(), 2);

                let by_price = service.search("price", "8.00").await.unwrap();
                assert_eq!(by_price.len(), 1);
                assert_eq!(by_price[0].sku, "CP-003");
            }

            #[tokio::test]
            async fn test_search_without_match() {
                let service = $factory;
                for product in sample_catalog() {
                    service.create(product).await.unwrap();
                }

                assert!(service.search("sku", "NOPE").await.unwrap().is_empty());
                assert!(service.search("nonexistent_field", "x").await.unwrap().is_empty());
            }

            // ==================================================================
            // Query
            // ==================================================================

            #[tokio::test]
            async fn test_query_filters_sorts_and_paginates() {
                let service = $factory;
                for product in sample_catalog() {
                    service.create(product).await.unwrap();
                }

                let query = RecordQuery::new()
                    .filter("price", Comparison::Gte, Decimal::new(800, 2))
                    .order_by("price", SortDirection::Desc)
                    .paginate(1, 2);
                let page = service.query(&query).await.unwrap();

                let codes: Vec<&str> = page.data.iter().map(|p| p.sku.as_str()).collect();
                assert_eq!(codes, vec!["DJ-004", "HD-002"]);
                assert_eq!(page.pagination.total, 4);
                assert_eq!(page.pagination.total_pages, 2);
                assert!(page.pagination.has_next);
                assert!(!page.pagination.has_prev);
            }

            // ==================================================================
            // Concurrent access
            // ==================================================================

            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn test_concurrent_access() {
                let service = $factory;
                let s1 = service.clone();
                let s2 = service.clone();

                let p1 = create_test_product("Concurrent A", "CA-001", 100, 1);
                let p2 = create_test_product("Concurrent B", "CB-002", 200, 2);
                let (id1, id2) = (p1.id, p2.id);

                let h1 = tokio::spawn(async move { s1.create(p1).await });
                let h2 = tokio::spawn(async move { s2.create(p2).await });
                let (r1, r2) = tokio::try_join!(h1, h2).unwrap();
                r1.unwrap();
                r2.unwrap();

                let ids: Vec<Uuid> = service.list().await.unwrap().iter().map(|p| p.id()).collect();
                assert_eq!(ids.len(), 2);
                assert!(ids.contains(&id1));
                assert!(ids.contains(&id2));
            }
        }
    };
}
