//! User-facing messages.

pub const INVALID_CREDENTIALS: &str = "Usuario o contraseña incorrectos";
pub const LOGIN_FAILED: &str = "Error al iniciar sesión. Inténtalo más tarde.";
pub const UNKNOWN_ERROR: &str = "Error desconocido. Inténtalo más tarde.";
pub const NO_RESPONSE: &str = "No se recibió respuesta del servidor";
pub const REQUEST_FAILED: &str = "Error al realizar la solicitud";

pub const REGISTER_FAILED: &str = "Error durante el registro";
pub const REGISTER_SUCCEEDED: &str = "Registro exitoso. Por favor, inicia sesión.";
pub const PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden";

pub const WELCOME: &str = "Bienvenido a tu cuenta";
pub const LOGGED_OUT: &str = "Sesión cerrada";
pub const NOT_LOGGED_IN: &str = "No has iniciado sesión";
pub const NO_TOKEN: &str = "No hay token almacenado";

pub const SPACES_LOAD_FAILED: &str = "Error al cargar los espacios";
pub const SPACE_FIELDS_REQUIRED: &str = "Todos los campos son obligatorios.";
pub const SPACE_CREATED: &str = "Espacio creado correctamente.";
pub const SPACE_CREATE_FAILED: &str = "Hubo un problema al crear el espacio. Intenta nuevamente.";
pub const SPACE_UPDATED: &str = "El espacio ha sido actualizado correctamente.";
pub const SPACE_UPDATE_FAILED: &str =
    "Hubo un problema al actualizar el espacio. Intenta nuevamente.";
pub const SPACE_DELETED: &str = "El espacio ha sido eliminado correctamente.";
pub const SPACE_DELETE_FAILED: &str =
    "Hubo un problema al eliminar el espacio. Intenta nuevamente.";

pub const RESERVATIONS_LOAD_FAILED: &str = "Error al cargar las reservas";
pub const NO_RESERVATIONS: &str = "No tienes reservas en este momento.";
pub const RESERVATION_FIELDS_REQUIRED: &str = "Por favor, complete todos los campos";
pub const RESERVATION_CREATED: &str = "Reserva creada exitosamente";
pub const RESERVATION_CREATE_FAILED: &str = "Error al crear la reserva";
pub const RESERVATION_CANCELLED: &str = "La reserva ha sido cancelada exitosamente.";
pub const RESERVATION_CANCEL_FAILED: &str = "No se pudo cancelar la reserva. Intenta nuevamente.";

pub const CONFIRMATION_REQUIRED: &str = "Confirma la operación con --yes";
