//! Order workflow: price, render, upload, record
//!
//! [`OrderWorkflow`] drives the side-effecting steps around the pure pricing
//! engine and document generator. The hosted database and blob store are
//! reached only through [`DataService`] and [`ObjectStorage`].
//!
//! There is no transaction spanning the blob store and the records. When a
//! later step fails, earlier writes are undone before the error is
//! returned: the uploaded document is deleted, partially written records
//! are removed and customer details are put back. A failed order leaves
//! nothing behind.

pub mod request;

pub use request::{PlaceOrderRequest, PlacedOrder, RequestedLine};

use crate::config::DeskConfig;
use crate::core::error::{DeskResult, EntityError, StorageError, WorkflowError};
use crate::core::events::{EventBus, OrderEvent};
use crate::core::query::{Page, RecordQuery};
use crate::core::{Data, DataService, Entity, ObjectStorage};
use crate::document::{OrderDocument, OrderDocumentGenerator};
use crate::entities::{Customer, CustomerDetails, Order, OrderItem, OrderStatus, Product};
use crate::order_number::OrderNumber;
use crate::pricing::{OrderLine, OrderPricing};
use crate::storage::InMemoryDataService;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use uuid::Uuid;

/// Record collections the workflow writes to
#[derive(Clone)]
pub struct OrderStores {
    pub customers: Arc<dyn DataService<Customer>>,
    pub products: Arc<dyn DataService<Product>>,
    pub orders: Arc<dyn DataService<Order>>,
    pub items: Arc<dyn DataService<OrderItem>>,
}

impl OrderStores {
    /// Empty in-memory collections
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(InMemoryDataService::<Customer>::new()),
            products: Arc::new(InMemoryDataService::<Product>::new()),
            orders: Arc::new(InMemoryDataService::<Order>::new()),
            items: Arc::new(InMemoryDataService::<OrderItem>::new()),
        }
    }
}

type NumberSource = Arc<dyn Fn(NaiveDate) -> OrderNumber + Send + Sync>;

/// Records and document written for a new order
struct Recorded {
    order: Order,
    items: Vec<OrderItem>,
    key: String,
    url: String,
}

/// What a revision replaces and with what
struct Revision<'a> {
    order: &'a Order,
    previous_items: &'a [OrderItem],
    product_ids: &'a [Uuid],
    pricing: &'a OrderPricing,
    key: &'a str,
    url: &'a str,
}

/// Places, revises and removes orders
#[derive(Clone)]
pub struct OrderWorkflow {
    stores: OrderStores,
    storage: Arc<dyn ObjectStorage>,
    generator: OrderDocumentGenerator,
    config: DeskConfig,
    events: EventBus,
    numbers: NumberSource,
}

impl OrderWorkflow {
    pub fn new(
        stores: OrderStores,
        storage: Arc<dyn ObjectStorage>,
        config: DeskConfig,
        events: EventBus,
    ) -> Self {
        let generator = OrderDocumentGenerator::new(config.currency.clone(), config.document.clone());
        Self {
            stores,
            storage,
            generator,
            config,
            events,
            numbers: Arc::new(OrderNumber::generate_for),
        }
    }

    /// Replace the random order number source
    pub fn with_order_numbers<F>(mut self, source: F) -> Self
    where
        F: Fn(NaiveDate) -> OrderNumber + Send + Sync + 'static,
    {
        self.numbers = Arc::new(source);
        self
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Place a new order and store its document
    ///
    /// On success an [`OrderEvent::Created`] is published.
    pub async fn place_order(&self, request: PlaceOrderRequest) -> DeskResult<PlacedOrder> {
        if request.lines.is_empty() {
            return Err(WorkflowError::EmptyOrder.into());
        }
        let details = request.customer.normalized();
        details.validate()?;

        let (product_ids, pricing) = self.price(&request).await?;
        let (customer, previous_customer) = self.upsert_customer(request.customer_id, &details).await?;

        let recorded = match self.record_order(&customer, &product_ids, &pricing).await {
            Ok(recorded) => recorded,
            Err(e) => {
                self.restore_customer(&customer, previous_customer).await;
                return Err(e);
            }
        };
        let Recorded { order, items, key, url } = recorded;

        tracing::info!(
            order_number = %order.order_number,
            order_id = %order.id,
            customer_id = %customer.id,
            total = %pricing.total,
            "order placed"
        );
        self.events.publish(OrderEvent::Created {
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_id: customer.id,
            pdf_url: url.clone(),
        });

        Ok(PlacedOrder {
            order,
            items,
            customer,
            pricing,
            document_url: url,
            document_key: key,
        })
    }

    /// Re-price an open order, re-render its document under the same order
    /// number and replace its items
    ///
    /// Records are written first and the stored document is overwritten
    /// last, so a failed revision leaves the previous document, items,
    /// total and customer details in place. On success an
    /// [`OrderEvent::Updated`] is published.
    pub async fn revise_order(&self, order_id: Uuid, request: PlaceOrderRequest) -> DeskResult<PlacedOrder> {
        let order = self.order(order_id).await?;
        let status = order.order_status();
        if status.is_final() {
            return Err(WorkflowError::OrderLocked {
                order_number: order.order_number.clone(),
                status: status.to_string(),
            }
            .into());
        }
        if request.lines.is_empty() {
            return Err(WorkflowError::EmptyOrder.into());
        }
        let details = request.customer.normalized();
        details.validate()?;

        let (product_ids, pricing) = self.price(&request).await?;
        let key = self.config.storage.document_key(&order.order_number);
        let url = match &order.pdf_url {
            Some(url) => url.clone(),
            None => self.storage.url(&key).await.map_err(|e| StorageError::Backend {
                message: e.to_string(),
            })?,
        };
        let previous_items = self.items_of(order.id).await?;

        let customer_id = request.customer_id.unwrap_or(order.customer_id);
        let (customer, previous_customer) = self.upsert_customer(Some(customer_id), &details).await?;

        let revision = Revision {
            order: &order,
            previous_items: &previous_items,
            product_ids: &product_ids,
            pricing: &pricing,
            key: &key,
            url: &url,
        };
        let (order, items) = match self.commit_revision(revision, &customer).await {
            Ok(done) => done,
            Err(e) => {
                self.restore_customer(&customer, previous_customer).await;
                return Err(e);
            }
        };

        tracing::info!(
            order_number = %order.order_number,
            order_id = %order.id,
            lines = items.len(),
            total = %pricing.total,
            "order revised"
        );
        self.events.publish(OrderEvent::Updated {
            order_id: order.id,
            order_number: order.order_number.clone(),
            pdf_url: url.clone(),
        });

        Ok(PlacedOrder {
            order,
            items,
            customer,
            pricing,
            document_url: url,
            document_key: key,
        })
    }

    /// Move an order to `status`
    ///
    /// Publishes [`OrderEvent::StatusChanged`] when the status actually changes.
    pub async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> DeskResult<Order> {
        let mut order = self.order(order_id).await?;
        let from = order.order_status();
        if from == status {
            return Ok(order);
        }

        order.set_order_status(status);
        let order = self
            .stores
            .orders
            .update(&order.id, order.clone())
            .await
            .map_err(|e| EntityError::operation("order", "update", e))?;

        tracing::info!(order_number = %order.order_number, %from, to = %status, "order status changed");
        self.events.publish(OrderEvent::StatusChanged {
            order_id,
            from,
            to: status,
        });
        Ok(order)
    }

    /// Remove an order, its items and its document
    ///
    /// The document goes last; failing to remove it is logged and leaves an
    /// orphaned blob rather than an order pointing at a missing document.
    pub async fn delete_order(&self, order_id: Uuid) -> DeskResult<()> {
        let order = self.order(order_id).await?;

        for item in self.items_of(order.id).await? {
            self.stores
                .items
                .delete(&item.id)
                .await
                .map_err(|e| EntityError::operation("order_item", "delete", e))?;
        }
        self.stores
            .orders
            .delete(&order.id)
            .await
            .map_err(|e| EntityError::operation("order", "delete", e))?;

        let key = self.config.storage.document_key(&order.order_number);
        if let Err(e) = self.storage.delete(&key).await {
            tracing::error!(key = %key, error = %e, "failed to remove document of deleted order");
        }

        tracing::info!(order_number = %order.order_number, order_id = %order.id, "order deleted");
        self.events.publish(OrderEvent::Deleted {
            order_id,
            order_number: order.order_number,
        });
        Ok(())
    }

    /// Retrieval URL of the order's stored document
    pub async fn document_url(&self, order_id: Uuid) -> DeskResult<String> {
        let order = self.order(order_id).await?;
        order.pdf_url.ok_or_else(|| {
            StorageError::NotFound {
                key: self.config.storage.document_key(&order.order_number),
            }
            .into()
        })
    }

    /// Orders of one customer, newest first
    pub async fn orders_for_customer(&self, customer_id: Uuid) -> DeskResult<Vec<Order>> {
        let mut orders = self
            .stores
            .orders
            .search("customer_id", &customer_id.to_string())
            .await
            .map_err(|e| EntityError::operation("order", "search", e))?;

        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    /// A page of orders for list views
    pub async fn order_page(&self, query: &RecordQuery) -> DeskResult<Page<Order>> {
        self.stores
            .orders
            .query(query)
            .await
            .map_err(|e| EntityError::operation("order", "query", e).into())
    }

    /// Items of an order
    pub async fn order_items(&self, order_id: Uuid) -> DeskResult<Vec<OrderItem>> {
        self.items_of(order_id).await
    }

    /// Products whose name or stock code contains `term`, by name
    pub async fn search_products(&self, term: &str) -> DeskResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .stores
            .products
            .list()
            .await
            .map_err(|e| EntityError::operation("product", "list", e))?
            .into_iter()
            .filter(|product| product.matches_term(term))
            .collect();

        products.sort_by_key(|product| product.name.to_lowercase());
        tracing::debug!(term, matches = products.len(), "product search");
        Ok(products)
    }

    async fn order(&self, order_id: Uuid) -> DeskResult<Order> {
        self.stores
            .orders
            .get(&order_id)
            .await
            .map_err(|e| EntityError::operation("order", "get", e))?
            .filter(|order| !order.is_deleted())
            .ok_or_else(|| {
                EntityError::NotFound {
                    entity_type: "order".to_string(),
                    id: order_id,
                }
                .into()
            })
    }

    async fn items_of(&self, order_id: Uuid) -> DeskResult<Vec<OrderItem>> {
        self.stores
            .items
            .search("order_id", &order_id.to_string())
            .await
            .map_err(|e| EntityError::operation("order_item", "search", e).into())
    }

    /// Load every requested product and price the lines
    async fn price(&self, request: &PlaceOrderRequest) -> DeskResult<(Vec<Uuid>, OrderPricing)> {
        let mut product_ids = Vec::with_capacity(request.lines.len());
        let mut lines: Vec<OrderLine> = Vec::with_capacity(request.lines.len());

        for requested in &request.lines {
            let product = self
                .stores
                .products
                .get(&requested.product_id)
                .await
                .map_err(|e| EntityError::operation("product", "get", e))?
                .filter(|product| !product.is_deleted())
                .ok_or(EntityError::NotFound {
                    entity_type: "product".to_string(),
                    id: requested.product_id,
                })?;

            product_ids.push(product.id);
            lines.push(product.order_line(requested.quantity, requested.discount_percent));
        }

        Ok((product_ids, OrderPricing::from_lines(&lines)?))
    }

    /// Create or update the customer; also returns the details held before
    /// an update so a failed order can put them back
    async fn upsert_customer(
        &self,
        customer_id: Option<Uuid>,
        details: &CustomerDetails,
    ) -> DeskResult<(Customer, Option<Customer>)> {
        let Some(id) = customer_id else {
            let created = self
                .stores
                .customers
                .create(Customer::from_details(details))
                .await
                .map_err(|e| EntityError::operation("customer", "create", e))?;
            return Ok((created, None));
        };

        let previous = self
            .stores
            .customers
            .get(&id)
            .await
            .map_err(|e| EntityError::operation("customer", "get", e))?
            .filter(|customer| !customer.is_deleted())
            .ok_or_else(|| EntityError::NotFound {
                entity_type: "customer".to_string(),
                id,
            })?;

        let mut customer = previous.clone();
        customer.apply_details(details);
        let updated = self
            .stores
            .customers
            .update(&id, customer)
            .await
            .map_err(|e| EntityError::operation("customer", "update", e))?;
        Ok((updated, Some(previous)))
    }

    /// Undo [`upsert_customer`](Self::upsert_customer)
    async fn restore_customer(&self, customer: &Customer, previous: Option<Customer>) {
        match previous {
            Some(previous) => {
                tracing::warn!(customer_id = %previous.id, "restoring customer details after failed write");
                if let Err(e) = self.stores.customers.update(&previous.id, previous.clone()).await {
                    tracing::error!(customer_id = %previous.id, error = %e, "failed to restore customer details");
                }
            }
            None => self.discard_record(&*self.stores.customers, customer.id).await,
        }
    }

    /// Number, render, upload and record a priced order
    ///
    /// Undoes its own writes on failure; the customer is left to the caller.
    async fn record_order(
        &self,
        customer: &Customer,
        product_ids: &[Uuid],
        pricing: &OrderPricing,
    ) -> DeskResult<Recorded> {
        let issued_on = Local::now().date_naive();
        let number = self.unused_order_number(issued_on).await?;
        let document = self.generator.render_on(
            issued_on,
            &customer.identity(),
            &pricing.lines,
            number.as_str(),
            pricing.total,
        )?;
        let (key, url) = self.store_document(document).await?;

        let mut order = Order::pending(number.as_str(), customer.id, pricing.total);
        order.pdf_url = Some(url.clone());
        let order = match self.stores.orders.create(order).await {
            Ok(order) => order,
            Err(e) => {
                self.discard_document(&key).await;
                return Err(EntityError::operation("order", "create", e).into());
            }
        };

        let items = match self.create_items(order.id, product_ids, pricing).await {
            Ok(items) => items,
            Err(e) => {
                self.discard_record(&*self.stores.orders, order.id).await;
                self.discard_document(&key).await;
                return Err(e);
            }
        };

        Ok(Recorded { order, items, key, url })
    }

    /// Write a revision: new items, the order record, removal of the old
    /// items, then the document
    ///
    /// Every failure undoes the record writes made so far. The document is
    /// only overwritten once all records are committed.
    async fn commit_revision(
        &self,
        revision: Revision<'_>,
        customer: &Customer,
    ) -> DeskResult<(Order, Vec<OrderItem>)> {
        let Revision { order, previous_items, product_ids, pricing, key, url } = revision;

        let document = self.generator.render(
            &customer.identity(),
            &pricing.lines,
            &order.order_number,
            pricing.total,
        )?;
        let items = self.create_items(order.id, product_ids, pricing).await?;

        let mut revised = order.clone();
        revised.customer_id = customer.id;
        revised.total_amount = pricing.total;
        revised.pdf_url = Some(url.to_string());
        revised.touch();
        let revised = match self.stores.orders.update(&order.id, revised).await {
            Ok(revised) => revised,
            Err(e) => {
                self.undo_revision(None, &items, &[]).await;
                return Err(EntityError::operation("order", "update", e).into());
            }
        };

        for (done, item) in previous_items.iter().enumerate() {
            if let Err(e) = self.stores.items.delete(&item.id).await {
                self.undo_revision(Some(order), &items, &previous_items[..done]).await;
                return Err(EntityError::operation("order_item", "delete", e).into());
            }
        }

        if let Err(e) = self
            .storage
            .upload(key, document.bytes, &self.config.storage.content_type)
            .await
        {
            self.undo_revision(Some(order), &items, previous_items).await;
            return Err(StorageError::UploadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }
            .into());
        }

        Ok((revised, items))
    }

    /// Put back the order record and items a failed revision replaced
    async fn undo_revision(&self, order: Option<&Order>, new_items: &[OrderItem], removed: &[OrderItem]) {
        for item in new_items {
            self.discard_record(&*self.stores.items, item.id).await;
        }
        for item in removed {
            if let Err(e) = self.stores.items.create(item.clone()).await {
                tracing::error!(order_item_id = %item.id, error = %e, "failed to restore order item");
            }
        }
        if let Some(order) = order {
            tracing::warn!(order_number = %order.order_number, "restoring order after failed revision");
            if let Err(e) = self.stores.orders.update(&order.id, order.clone()).await {
                tracing::error!(order_number = %order.order_number, error = %e, "failed to restore order");
            }
        }
    }

    /// Draw order numbers until one is not used by an existing order
    async fn unused_order_number(&self, issued_on: NaiveDate) -> DeskResult<OrderNumber> {
        let attempts = self.config.order_numbers.max_attempts;
        for attempt in 1..=attempts {
            let candidate = (self.numbers)(issued_on);
            let taken = self
                .stores
                .orders
                .search("order_number", candidate.as_str())
                .await
                .map_err(|e| EntityError::operation("order", "search", e))?;
            if taken.is_empty() {
                return Ok(candidate);
            }
            tracing::debug!(order_number = %candidate, attempt, "order number already taken");
        }

        tracing::warn!(attempts, "no unused order number found");
        Err(WorkflowError::OrderNumberExhausted { attempts }.into())
    }

    /// Upload a rendered document, returning its key and retrieval URL
    async fn store_document(&self, document: OrderDocument) -> DeskResult<(String, String)> {
        let key = self.config.storage.document_key(&document.order_number);
        let size = document.bytes.len();

        self.storage
            .upload(&key, document.bytes, &self.config.storage.content_type)
            .await
            .map_err(|e| StorageError::UploadFailed {
                key: key.clone(),
                message: e.to_string(),
            })?;

        let url = match self.storage.url(&key).await {
            Ok(url) => url,
            Err(e) => {
                self.discard_document(&key).await;
                return Err(StorageError::Backend {
                    message: e.to_string(),
                }
                .into());
            }
        };

        tracing::debug!(key = %key, bytes = size, "order document uploaded");
        Ok((key, url))
    }

    /// Create one item per priced line; on failure the items already
    /// created are removed again
    async fn create_items(
        &self,
        order_id: Uuid,
        product_ids: &[Uuid],
        pricing: &OrderPricing,
    ) -> DeskResult<Vec<OrderItem>> {
        let mut created: Vec<OrderItem> = Vec::with_capacity(pricing.lines.len());

        for (product_id, line) in product_ids.iter().zip(&pricing.lines) {
            let item = OrderItem::from_line(order_id, *product_id, line);
            match self.stores.items.create(item).await {
                Ok(item) => created.push(item),
                Err(e) => {
                    for item in &created {
                        self.discard_record(&*self.stores.items, item.id).await;
                    }
                    return Err(EntityError::operation("order_item", "create", e).into());
                }
            }
        }

        Ok(created)
    }

    async fn discard_document(&self, key: &str) {
        tracing::warn!(key, "removing uploaded order document after failed write");
        if let Err(e) = self.storage.delete(key).await {
            tracing::error!(key, error = %e, "failed to remove orphaned order document");
        }
    }

    async fn discard_record<T>(&self, service: &dyn DataService<T>, id: Uuid)
    where
        T: Data,
    {
        tracing::warn!(record = T::resource_name_singular(), %id, "removing record after failed write");
        if let Err(e) = service.delete(&id).await {
            tracing::error!(record = T::resource_name_singular(), %id, error = %e, "failed to remove orphaned record");
        }
    }
}
