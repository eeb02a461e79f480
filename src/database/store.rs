use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::database::collection::{DocumentCollection, PgCollection};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::memory::MemoryCollection;
use crate::database::models::{Booking, Hotel, Room, User};
use crate::database::repository::{Document, Repository};

/// All repositories behind one handle; cheap to share across requests.
#[derive(Clone)]
pub struct Store {
    pub users: Repository<User>,
    pub hotels: Repository<Hotel>,
    pub rooms: Repository<Room>,
    pub bookings: Repository<Booking>,
    pool: Option<PgPool>,
}

impl Store {
    pub const COLLECTIONS: [&'static str; 4] = [
        User::COLLECTION,
        Hotel::COLLECTION,
        Room::COLLECTION,
        Booking::COLLECTION,
    ];

    /// Open the configured backend, creating postgres collections when needed.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match config.backend {
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(config).await?;
                DatabaseManager::ensure_collections(&pool, &Self::COLLECTIONS).await?;
                Self::postgres(pool)
            }
            StoreBackend::Memory => {
                info!("Using in-memory store; data is lost on shutdown");
                Ok(Self::memory())
            }
        }
    }

    pub fn postgres(pool: PgPool) -> Result<Self, DatabaseError> {
        let collection = |name: &str| -> Result<Arc<dyn DocumentCollection>, DatabaseError> {
            Ok(Arc::new(PgCollection::new(name, pool.clone())?))
        };
        Ok(Self {
            users: Repository::new(collection(User::COLLECTION)?),
            hotels: Repository::new(collection(Hotel::COLLECTION)?),
            rooms: Repository::new(collection(Room::COLLECTION)?),
            bookings: Repository::new(collection(Booking::COLLECTION)?),
            pool: Some(pool),
        })
    }

    pub fn memory() -> Self {
        Self {
            users: Repository::new(Arc::new(MemoryCollection::new(User::COLLECTION).with_unique("email"))),
            hotels: Repository::new(Arc::new(MemoryCollection::new(Hotel::COLLECTION))),
            rooms: Repository::new(Arc::new(MemoryCollection::new(Room::COLLECTION))),
            bookings: Repository::new(Arc::new(MemoryCollection::new(Booking::COLLECTION))),
            pool: None,
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.pool {
            Some(pool) => DatabaseManager::health_check(pool).await,
            None => Ok(()),
        }
    }

    /// Insert a room and append its id to the owning hotel's room set.
    /// The hotel must exist.
    pub async fn insert_room(&self, room: Room) -> Result<Room, DatabaseError> {
        self.hotels.select_id(room.hotel_id).await?;
        let room = self.rooms.insert(room).await?;
        self.hotels.push(room.hotel_id, "rooms", room.id).await?;
        Ok(room)
    }

    /// Empty every collection.
    pub async fn clear(&self) -> Result<(), DatabaseError> {
        self.bookings.clear().await?;
        self.rooms.clear().await?;
        self.hotels.clear().await?;
        self.users.clear().await?;
        Ok(())
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
