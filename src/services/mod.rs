mod geofence;

pub use geofence::GeofenceService;
